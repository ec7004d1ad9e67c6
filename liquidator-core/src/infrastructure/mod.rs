//! Infrastructure layer - adapters for the application ports
//!
//! File and in-memory storage, ethers-based node and wallet adapters, the
//! DeBank portfolio client and layered configuration.

pub mod platform;
pub mod ethereum;
pub mod debank;
pub mod config;

// Re-export infrastructure components
pub use config::{LiquidatorConfig, TimeoutConfig};
pub use debank::DebankClient;
pub use ethereum::{EthersConnector, EthersNode, JsonRpcWallet};
pub use platform::*;
