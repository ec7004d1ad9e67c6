//! Cache reconciler
//!
//! Folds a freshly read on-chain balance back into the in-memory token list
//! and the persisted portfolio blob, so the dashboard reflects a swap without
//! a full portfolio refetch.

use crate::domain::entities::{TokenBalance, TokenIdentity};
use crate::domain::repositories::portfolio_repository::PortfolioStore;
use crate::shared::error::LiquidatorError;
use ethers::types::U256;

pub struct CacheReconciler {
    store: PortfolioStore,
}

impl CacheReconciler {
    pub fn new(store: PortfolioStore) -> Self {
        Self { store }
    }

    /// Apply `raw` to the token matching `identity`.
    ///
    /// Updates `tokens` in place and, when a blob is cached for `wallet`, the
    /// matching entry in it. The blob's `lastUpdated` is left alone. Returns the
    /// updated in-memory entry, or `None` when the list does not hold the token.
    pub async fn reconcile(
        &self,
        wallet: &str,
        tokens: &mut [TokenBalance],
        identity: &TokenIdentity,
        raw: U256,
        decimals: u8,
    ) -> Result<Option<TokenBalance>, LiquidatorError> {
        let updated = match tokens.iter_mut().find(|token| identity.matches(token)) {
            Some(token) => {
                token.apply_raw_balance(raw, decimals);
                Some(token.clone())
            }
            None => {
                log::warn!("{} on {} is not in the loaded portfolio", identity.id, identity.chain);
                None
            }
        };

        match self.store.load_portfolio(wallet).await? {
            Some(mut cached) => match cached.find_mut(identity) {
                Some(entry) => {
                    entry.apply_raw_balance(raw, decimals);
                    self.store.save_portfolio(wallet, &cached).await?;
                    log::debug!("Persisted new balance of {} for {}", identity.id, wallet);
                }
                None => {
                    log::debug!("Cached portfolio for {} has no entry for {}", wallet, identity.id);
                }
            },
            None => {
                log::debug!("No cached portfolio for {}, updated memory only", wallet);
            }
        }

        Ok(updated)
    }
}
