//! Network switch coordinator
//!
//! Asks the wallet to move to the chain a swap needs. Switching is
//! best-effort: a refused or failed switch is logged and the flow carries on.

use crate::application::ports::WalletProvider;
use crate::shared::constants::SWITCH_SETTLE_DELAY;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

pub struct NetworkSwitchCoordinator {
    wallet: Arc<dyn WalletProvider>,
    settle_delay: Duration,
}

impl NetworkSwitchCoordinator {
    pub fn new(wallet: Arc<dyn WalletProvider>) -> Self {
        Self {
            wallet,
            settle_delay: SWITCH_SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Request a switch to `chain_id`. Always reports ready.
    pub async fn switch_to(&self, chain_id: u64) -> bool {
        sleep(self.settle_delay).await;

        match self.wallet.switch_chain(chain_id).await {
            Ok(()) => match self.wallet.chain_id().await {
                Ok(active) if active == chain_id => {
                    log::info!("Wallet switched to chain {}", chain_id);
                }
                Ok(active) => {
                    log::warn!("Requested chain {} but wallet reports chain {}", chain_id, active);
                }
                Err(e) => {
                    log::warn!("Switched to chain {} but could not read it back: {}", chain_id, e);
                }
            },
            Err(e) => {
                log::warn!("Wallet refused switch to chain {}, continuing: {}", chain_id, e);
            }
        }

        sleep(self.settle_delay).await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockWalletProvider;
    use crate::shared::error::LiquidatorError;
    use mockall::predicate::eq;

    #[tokio::test(start_paused = true)]
    async fn test_successful_switch_settles_before_and_after() {
        let mut wallet = MockWalletProvider::new();
        wallet.expect_switch_chain().with(eq(137)).times(1).returning(|_| Ok(()));
        wallet.expect_chain_id().times(1).returning(|| Ok(137));
        let coordinator = NetworkSwitchCoordinator::new(Arc::new(wallet));
        let started = tokio::time::Instant::now();

        assert!(coordinator.switch_to(137).await);
        assert!(started.elapsed() >= SWITCH_SETTLE_DELAY * 2);
    }

    #[tokio::test]
    async fn test_refused_switch_still_ready() {
        let mut wallet = MockWalletProvider::new();
        wallet
            .expect_switch_chain()
            .times(1)
            .returning(|_| Err(LiquidatorError::provider_request("User rejected the request.")));
        wallet.expect_chain_id().never();
        let coordinator =
            NetworkSwitchCoordinator::new(Arc::new(wallet)).with_settle_delay(Duration::ZERO);

        assert!(coordinator.switch_to(1).await);
    }

    #[tokio::test]
    async fn test_unsupported_chain_still_ready() {
        let mut wallet = MockWalletProvider::new();
        wallet.expect_switch_chain().with(eq(999_999)).returning(|_| {
            Err(LiquidatorError::provider_request("Unrecognized chain ID \"0xf423f\""))
        });
        let coordinator =
            NetworkSwitchCoordinator::new(Arc::new(wallet)).with_settle_delay(Duration::ZERO);

        assert!(coordinator.switch_to(999_999).await);
    }

    #[tokio::test]
    async fn test_mismatched_chain_after_switch_still_ready() {
        let mut wallet = MockWalletProvider::new();
        wallet.expect_switch_chain().returning(|_| Ok(()));
        wallet.expect_chain_id().returning(|| Ok(1));
        let coordinator =
            NetworkSwitchCoordinator::new(Arc::new(wallet)).with_settle_delay(Duration::ZERO);

        assert!(coordinator.switch_to(10).await);
    }
}
