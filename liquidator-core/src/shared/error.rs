//! Error handling for the liquidator core
//!
//! This module defines the error types used throughout the liquidator core.

use std::time::Duration;
use thiserror::Error;

/// Message fragments that identify a provider which could not reach its network.
const NETWORK_UNDETECTABLE_SIGNATURES: &[&str] = &[
    "could not detect network",
    "nonetwork",
];

/// Liquidator error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LiquidatorError {
    #[error("No healthy RPC endpoint for chain {chain_id}")]
    NoHealthyEndpoint { chain_id: u64 },

    #[error("RPC call timed out: {0}")]
    RpcTimeout(String),

    #[error("Contract call failed: {0}")]
    ContractCall(String),

    #[error("Wallet provider request failed: {0}")]
    ProviderRequestFailed(String),

    /// Carries the portfolio provider's message verbatim.
    #[error("{0}")]
    PortfolioApi(String),

    #[error("Transaction {tx_hash} was not confirmed after {attempts} attempts")]
    MonitorTimedOut { tx_hash: String, attempts: u32 },

    #[error("Unsupported chain: {0}")]
    UnsupportedChain(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LiquidatorError {
    pub fn no_healthy_endpoint(chain_id: u64) -> Self {
        Self::NoHealthyEndpoint { chain_id }
    }

    /// Create a timeout error for the named call
    pub fn rpc_timeout(call: &str, after: Duration) -> Self {
        Self::RpcTimeout(format!("{} did not answer within {}ms", call, after.as_millis()))
    }

    /// Create a contract call error
    pub fn contract_call(message: impl Into<String>) -> Self {
        Self::ContractCall(message.into())
    }

    /// Create a wallet provider error
    pub fn provider_request(message: impl Into<String>) -> Self {
        Self::ProviderRequestFailed(message.into())
    }

    /// Create a portfolio API error
    pub fn portfolio_api(message: impl Into<String>) -> Self {
        Self::PortfolioApi(message.into())
    }

    pub fn monitor_timed_out(tx_hash: impl Into<String>, attempts: u32) -> Self {
        Self::MonitorTimedOut { tx_hash: tx_hash.into(), attempts }
    }

    pub fn unsupported_chain(chain: impl Into<String>) -> Self {
        Self::UnsupportedChain(chain.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True when a chain call failed because the provider never reached its network.
    ///
    /// Balance reads retry these exactly once.
    pub fn is_network_undetectable(&self) -> bool {
        match self {
            Self::ContractCall(message) | Self::ProviderRequestFailed(message) => {
                let message = message.to_lowercase();
                NETWORK_UNDETECTABLE_SIGNATURES
                    .iter()
                    .any(|signature| message.contains(signature))
            }
            _ => false,
        }
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoHealthyEndpoint { .. } => "NO_HEALTHY_ENDPOINT",
            Self::RpcTimeout(_) => "RPC_TIMEOUT",
            Self::ContractCall(_) => "CONTRACT_CALL_ERROR",
            Self::ProviderRequestFailed(_) => "PROVIDER_REQUEST_FAILED",
            Self::PortfolioApi(_) => "PORTFOLIO_API_ERROR",
            Self::MonitorTimedOut { .. } => "MONITOR_TIMED_OUT",
            Self::UnsupportedChain(_) => "UNSUPPORTED_CHAIN",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for LiquidatorError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("IO error: {}", err))
    }
}

impl From<hex::FromHexError> for LiquidatorError {
    fn from(err: hex::FromHexError) -> Self {
        Self::validation(format!("Hex decoding error: {}", err))
    }
}

impl From<serde_json::Error> for LiquidatorError {
    fn from(err: serde_json::Error) -> Self {
        Self::storage(format!("JSON error: {}", err))
    }
}

impl From<tokio::task::JoinError> for LiquidatorError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Task join error: {}", err))
    }
}

impl From<config::ConfigError> for LiquidatorError {
    fn from(err: config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}

/// Result type for liquidator operations
pub type LiquidatorResult<T> = Result<T, LiquidatorError>;
