//! Layered configuration
//!
//! Built-in defaults, then an optional `liquidator.{toml,json}` file, then
//! `LIQUIDATOR_*` environment variables. Nested keys use `__`, for example
//! `LIQUIDATOR_TIMEOUTS__MONITOR_MAX_ATTEMPTS=120` or
//! `LIQUIDATOR_RPC_ENDPOINTS__137=https://a,https://b`.

use crate::domain::entities::{MonitorPolicy, RpcEndpointSet};
use crate::infrastructure::platform::default_data_dir;
use crate::shared::constants::{
    CALL_TIMEOUT, DEFAULT_PORTFOLIO_API_URL, DEFAULT_WALLET_RPC_URL, MONITOR_INITIAL_DELAY, MONITOR_MAX_ATTEMPTS,
    MONITOR_POLL_INTERVAL, NETWORK_RETRY_DELAY, PORTFOLIO_REQUEST_TIMEOUT, PROBE_TIMEOUT, RECEIPT_TIMEOUT,
    SWITCH_SETTLE_DELAY,
};
use crate::shared::error::LiquidatorError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "liquidator";
pub const ENV_PREFIX: &str = "LIQUIDATOR";

/// Endpoint override for one chain: a list, or one comma-separated string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EndpointList {
    Many(Vec<String>),
    One(String),
}

impl EndpointList {
    pub fn urls(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            EndpointList::Many(urls) => urls.iter().map(String::as_str).collect(),
            EndpointList::One(urls) => urls.split(',').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    pub probe_ms: u64,
    pub call_ms: u64,
    pub retry_delay_ms: u64,
    pub switch_settle_ms: u64,
    pub receipt_ms: u64,
    pub portfolio_request_ms: u64,
    pub monitor_initial_delay_ms: u64,
    pub monitor_poll_interval_ms: u64,
    pub monitor_max_attempts: u32,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            probe_ms: PROBE_TIMEOUT.as_millis() as u64,
            call_ms: CALL_TIMEOUT.as_millis() as u64,
            retry_delay_ms: NETWORK_RETRY_DELAY.as_millis() as u64,
            switch_settle_ms: SWITCH_SETTLE_DELAY.as_millis() as u64,
            receipt_ms: RECEIPT_TIMEOUT.as_millis() as u64,
            portfolio_request_ms: PORTFOLIO_REQUEST_TIMEOUT.as_millis() as u64,
            monitor_initial_delay_ms: MONITOR_INITIAL_DELAY.as_millis() as u64,
            monitor_poll_interval_ms: MONITOR_POLL_INTERVAL.as_millis() as u64,
            monitor_max_attempts: MONITOR_MAX_ATTEMPTS,
        }
    }
}

impl TimeoutConfig {
    pub fn probe(&self) -> Duration {
        Duration::from_millis(self.probe_ms)
    }

    pub fn call(&self) -> Duration {
        Duration::from_millis(self.call_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn switch_settle(&self) -> Duration {
        Duration::from_millis(self.switch_settle_ms)
    }

    pub fn receipt(&self) -> Duration {
        Duration::from_millis(self.receipt_ms)
    }

    pub fn portfolio_request(&self) -> Duration {
        Duration::from_millis(self.portfolio_request_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LiquidatorConfig {
    pub data_dir: PathBuf,
    pub wallet_rpc_url: String,
    pub portfolio_api_url: String,
    /// Seeds the stored access key when none has been saved yet
    pub portfolio_api_key: Option<String>,
    /// Per-chain endpoint lists keyed by chain id, replacing the built-in list
    pub rpc_endpoints: HashMap<String, EndpointList>,
    pub timeouts: TimeoutConfig,
}

impl Default for LiquidatorConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            wallet_rpc_url: DEFAULT_WALLET_RPC_URL.to_string(),
            portfolio_api_url: DEFAULT_PORTFOLIO_API_URL.to_string(),
            portfolio_api_key: None,
            rpc_endpoints: HashMap::new(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl LiquidatorConfig {
    /// Load from `.env`, `liquidator.*` in the working directory and `LIQUIDATOR_*`.
    pub fn load() -> Result<Self, LiquidatorError> {
        dotenv::dotenv().ok();
        Self::load_from(Some(CONFIG_FILE_NAME), ENV_PREFIX)
    }

    pub fn load_from(file: Option<&str>, env_prefix: &str) -> Result<Self, LiquidatorError> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LiquidatorError> {
        check_url("wallet_rpc_url", &self.wallet_rpc_url)?;
        check_url("portfolio_api_url", &self.portfolio_api_url)?;
        for (chain, urls) in self.endpoint_overrides()? {
            if urls.is_empty() {
                return Err(LiquidatorError::config(format!("rpc_endpoints.{} is empty", chain)));
            }
            for url in &urls {
                check_url(&format!("rpc_endpoints.{}", chain), url)?;
            }
        }
        if self.timeouts.monitor_max_attempts == 0 {
            return Err(LiquidatorError::config("timeouts.monitor_max_attempts must be at least 1"));
        }
        Ok(())
    }

    fn endpoint_overrides(&self) -> Result<HashMap<u64, Vec<String>>, LiquidatorError> {
        self.rpc_endpoints
            .iter()
            .map(|(chain, urls)| {
                let chain_id = chain
                    .parse::<u64>()
                    .map_err(|_| LiquidatorError::config(format!("rpc_endpoints key {} is not a chain id", chain)))?;
                Ok((chain_id, urls.urls()))
            })
            .collect()
    }

    /// Built-in endpoints with the configured overrides applied
    pub fn endpoint_set(&self) -> Result<RpcEndpointSet, LiquidatorError> {
        Ok(RpcEndpointSet::defaults().with_overrides(self.endpoint_overrides()?))
    }

    pub fn monitor_policy(&self) -> MonitorPolicy {
        MonitorPolicy {
            initial_delay: Duration::from_millis(self.timeouts.monitor_initial_delay_ms),
            poll_interval: Duration::from_millis(self.timeouts.monitor_poll_interval_ms),
            max_attempts: self.timeouts.monitor_max_attempts,
        }
    }
}

fn check_url(field: &str, url: &str) -> Result<(), LiquidatorError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(LiquidatorError::config(format!("{} must be an http(s) URL, got {:?}", field, url)))
    }
}
