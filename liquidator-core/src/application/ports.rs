//! Ports to the external collaborators
//!
//! The workflow components only talk to wallets, nodes and the portfolio API
//! through these traits; `infrastructure` provides the real adapters.

use crate::domain::entities::{ReceiptInfo, TokenBalance};
use crate::shared::error::LiquidatorError;
use crate::shared::types::Notification;
use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::sync::Arc;

/// The user's wallet, reached over its JSON-RPC interface
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet to expose its accounts (`eth_requestAccounts`)
    async fn request_accounts(&self) -> Result<Vec<String>, LiquidatorError>;

    /// Accounts currently exposed (`eth_accounts`)
    async fn list_accounts(&self) -> Result<Vec<String>, LiquidatorError>;

    /// `wallet_switchEthereumChain`
    async fn switch_chain(&self, chain_id: u64) -> Result<(), LiquidatorError>;

    /// Active chain id
    async fn chain_id(&self) -> Result<u64, LiquidatorError>;
}

/// A live connection to one node endpoint
#[async_trait]
pub trait ChainNode: Send + Sync {
    /// Latest block number; doubles as the liveness probe
    async fn block_number(&self) -> Result<u64, LiquidatorError>;

    /// ERC-20 `balanceOf(owner)`
    async fn erc20_balance(&self, token: Address, owner: Address) -> Result<U256, LiquidatorError>;

    /// ERC-20 `decimals()`
    async fn erc20_decimals(&self, token: Address) -> Result<u8, LiquidatorError>;

    /// Native coin balance
    async fn native_balance(&self, owner: Address) -> Result<U256, LiquidatorError>;

    /// Receipt with its confirmation depth, `None` while unmined
    async fn transaction_receipt(&self, tx_hash: H256) -> Result<Option<ReceiptInfo>, LiquidatorError>;
}

/// Opens node connections for endpoint URLs
pub trait NodeConnector: Send + Sync {
    fn connect(&self, chain_id: u64, url: &str) -> Result<Arc<dyn ChainNode>, LiquidatorError>;
}

/// Source of the multi-chain token list
#[async_trait]
pub trait PortfolioSource: Send + Sync {
    async fn fetch_tokens(&self, wallet: &str, access_key: &str) -> Result<Vec<TokenBalance>, LiquidatorError>;
}

/// Sink for transient user-facing notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
