use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Settings for the HTTP surface. Workflow settings live in
/// `liquidator_core::LiquidatorConfig`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_directory: String,
    pub enable_file_logging: bool,
    /// Comma-separated allowed origins, `*` for any
    pub cors_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "127.0.0.1".to_string(),
            port: 4000,
            log_level: "debug".to_string(),
            log_directory: "logs".to_string(),
            enable_file_logging: true,
            cors_origins: "*".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from a variable lookup; `RUST_ENV` picks the defaults.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = var("RUST_ENV").unwrap_or_else(|| "development".to_string());
        let production = environment == "production";

        let config = Self {
            host: var("HOST").unwrap_or_else(|| if production { "0.0.0.0" } else { "127.0.0.1" }.to_string()),
            port: u16::from_str(&var("PORT").unwrap_or_else(|| "4000".to_string()))
                .map_err(|e| anyhow!("PORT is not a port number: {e}"))?,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| if production { "info" } else { "debug" }.to_string()),
            log_directory: var("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            enable_file_logging: var("LOG_TO_FILE").unwrap_or_else(|| "true".to_string()) == "true",
            cors_origins: match var("CORS_ORIGINS") {
                Some(origins) => origins,
                None if production => return Err(anyhow!("CORS_ORIGINS must be set in production")),
                None => "*".to_string(),
            },
            environment,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("PORT must not be 0"));
        }
        if self.cors_origins.trim().is_empty() {
            return Err(anyhow!("CORS_ORIGINS must not be empty"));
        }
        Ok(())
    }

    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        if self.cors_origins.trim() == "*" {
            return None;
        }
        Some(
            self.cors_origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}
