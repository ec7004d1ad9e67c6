//! Storage repository for data access
//!
//! Key-value port for the dashboard's persisted state: one portfolio blob
//! per wallet plus a few scalar preferences.

use crate::shared::error::LiquidatorError;
use async_trait::async_trait;

/// Storage repository trait
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, LiquidatorError>;

    /// Replace the value stored under `key`
    async fn set(&self, key: &str, value: &str) -> Result<(), LiquidatorError>;

    /// Delete stored data
    async fn delete(&self, key: &str) -> Result<(), LiquidatorError>;

    /// Check if key exists
    async fn exists(&self, key: &str) -> Result<bool, LiquidatorError> {
        Ok(self.get(key).await?.is_some())
    }
}
