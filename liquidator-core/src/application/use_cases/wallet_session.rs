//! Wallet connection state

use crate::application::ports::WalletProvider;
use crate::shared::error::LiquidatorError;
use crate::shared::types::WalletAddress;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct WalletSession {
    wallet: Arc<dyn WalletProvider>,
    address: RwLock<Option<WalletAddress>>,
}

impl WalletSession {
    pub fn new(wallet: Arc<dyn WalletProvider>) -> Self {
        Self {
            wallet,
            address: RwLock::new(None),
        }
    }

    /// Ask the wallet for access and adopt its first account.
    pub async fn connect(&self) -> Result<WalletAddress, LiquidatorError> {
        self.wallet.request_accounts().await?;
        let accounts = self.wallet.list_accounts().await?;
        let address = accounts
            .into_iter()
            .next()
            .ok_or_else(|| LiquidatorError::provider_request("Wallet exposed no accounts"))?;

        log::info!("Wallet connected: {}", address);
        *self.address.write().await = Some(address.clone());
        Ok(address)
    }

    pub async fn disconnect(&self) {
        if let Some(address) = self.address.write().await.take() {
            log::info!("Wallet disconnected: {}", address);
        }
    }

    pub async fn address(&self) -> Option<WalletAddress> {
        self.address.read().await.clone()
    }

    pub fn provider(&self) -> Arc<dyn WalletProvider> {
        self.wallet.clone()
    }
}
