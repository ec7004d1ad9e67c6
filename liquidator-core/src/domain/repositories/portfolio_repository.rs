//! Typed access to the persisted dashboard state

use super::storage_repository::StorageRepository;
use crate::domain::entities::CachedPortfolio;
use crate::shared::constants::{dest_token_storage_key, portfolio_storage_key, API_KEY_STORAGE_KEY};
use crate::shared::error::LiquidatorError;
use std::sync::Arc;

/// Portfolio blobs, the portfolio API access key and destination token
/// preferences, on top of a [`StorageRepository`].
#[derive(Clone)]
pub struct PortfolioStore {
    storage: Arc<dyn StorageRepository>,
}

impl PortfolioStore {
    pub fn new(storage: Arc<dyn StorageRepository>) -> Self {
        Self { storage }
    }

    /// Cached portfolio for `wallet`, if one was ever persisted.
    ///
    /// An unreadable blob is treated as absent so the caller refetches.
    pub async fn load_portfolio(&self, wallet: &str) -> Result<Option<CachedPortfolio>, LiquidatorError> {
        let key = portfolio_storage_key(wallet);
        match self.storage.get(&key).await? {
            Some(blob) => match serde_json::from_str::<CachedPortfolio>(&blob) {
                Ok(portfolio) => Ok(Some(portfolio)),
                Err(e) => {
                    log::warn!("Discarding unreadable portfolio cache for {}: {}", key, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    pub async fn save_portfolio(&self, wallet: &str, portfolio: &CachedPortfolio) -> Result<(), LiquidatorError> {
        let blob = serde_json::to_string(portfolio)?;
        self.storage.set(&portfolio_storage_key(wallet), &blob).await
    }

    pub async fn api_key(&self) -> Result<Option<String>, LiquidatorError> {
        Ok(self
            .storage
            .get(API_KEY_STORAGE_KEY)
            .await?
            .filter(|key| !key.trim().is_empty()))
    }

    pub async fn set_api_key(&self, key: &str) -> Result<(), LiquidatorError> {
        self.storage.set(API_KEY_STORAGE_KEY, key.trim()).await
    }

    pub async fn destination_token(&self, chain: &str) -> Result<Option<String>, LiquidatorError> {
        self.storage.get(&dest_token_storage_key(chain)).await
    }

    pub async fn set_destination_token(&self, chain: &str, address: &str) -> Result<(), LiquidatorError> {
        self.storage.set(&dest_token_storage_key(chain), address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::token::sample_token;
    use crate::infrastructure::platform::MemoryStorage;

    fn store() -> (Arc<MemoryStorage>, PortfolioStore) {
        let storage = Arc::new(MemoryStorage::new());
        (storage.clone(), PortfolioStore::new(storage))
    }

    #[tokio::test]
    async fn test_portfolio_blob_keyed_by_lowercase_wallet() {
        let (storage, store) = store();
        let portfolio = CachedPortfolio::new(vec![sample_token("USDC", "eth", 100.0, 6, 1.0)]);

        store.save_portfolio("0xABCDEF", &portfolio).await.unwrap();

        assert!(storage.get("0xabcdef").await.unwrap().is_some());
        assert_eq!(store.load_portfolio("0xAbCdEf").await.unwrap(), Some(portfolio));
    }

    #[tokio::test]
    async fn test_unreadable_blob_is_absent() {
        let (storage, store) = store();
        storage.set("0xabc", "not json").await.unwrap();
        assert_eq!(store.load_portfolio("0xabc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_scalar_preferences() {
        let (storage, store) = store();
        assert_eq!(store.api_key().await.unwrap(), None);

        store.set_api_key("  secret ").await.unwrap();
        assert_eq!(store.api_key().await.unwrap().as_deref(), Some("secret"));
        assert_eq!(storage.get("debankApiKey").await.unwrap().as_deref(), Some("secret"));

        store.set_destination_token("eth", "0xA0b8").await.unwrap();
        assert_eq!(store.destination_token("eth").await.unwrap().as_deref(), Some("0xA0b8"));
        assert_eq!(store.destination_token("matic").await.unwrap(), None);
    }
}
