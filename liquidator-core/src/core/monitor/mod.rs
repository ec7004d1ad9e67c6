//! Transaction monitor
//!
//! Drives a [`MonitoredTransaction`] through its polling schedule: wait out the
//! initial delay, then poll for the receipt at a fixed interval until it is
//! confirmed or the attempt budget runs out. Polls never overlap.

use crate::core::endpoints::EndpointProber;
use crate::domain::entities::{
    MonitorPolicy, MonitorState, MonitorStep, MonitoredTransaction, PollObservation, ReceiptInfo,
};
use crate::shared::constants::RECEIPT_TIMEOUT;
use crate::shared::error::LiquidatorError;
use ethers::types::H256;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{sleep, timeout};

/// Liveness flag of the swap session a monitor belongs to.
///
/// Once closed, the monitor stops at its next tick without polling.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    active: Arc<AtomicBool>,
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGuard {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn close(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MonitorOutcome {
    Confirmed { receipt: ReceiptInfo, attempts: u32 },
    TimedOut { attempts: u32 },
    Abandoned { attempts: u32 },
}

pub struct TransactionMonitor {
    prober: Arc<EndpointProber>,
    policy: MonitorPolicy,
    receipt_timeout: Duration,
}

impl TransactionMonitor {
    pub fn new(prober: Arc<EndpointProber>) -> Self {
        Self {
            prober,
            policy: MonitorPolicy::default(),
            receipt_timeout: RECEIPT_TIMEOUT,
        }
    }

    pub fn with_policy(mut self, policy: MonitorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_receipt_timeout(mut self, receipt_timeout: Duration) -> Self {
        self.receipt_timeout = receipt_timeout;
        self
    }

    pub fn policy(&self) -> MonitorPolicy {
        self.policy
    }

    /// Fresh value object for a submitted hash, in the Idle state
    pub fn track(&self, tx_hash: H256, chain_id: u64) -> MonitoredTransaction {
        MonitoredTransaction::new(tx_hash, chain_id, self.policy)
    }

    /// One receipt query against a freshly probed endpoint
    pub async fn poll_once(&self, tx: &MonitoredTransaction) -> PollObservation {
        let endpoint = match self.prober.probe(tx.chain_id).await {
            Ok(endpoint) => endpoint,
            Err(e) => return PollObservation::Failed(e.to_string()),
        };

        match timeout(self.receipt_timeout, endpoint.node.transaction_receipt(tx.tx_hash)).await {
            Err(_) => PollObservation::Failed(
                LiquidatorError::rpc_timeout("eth_getTransactionReceipt", self.receipt_timeout).to_string(),
            ),
            Ok(Err(e)) => PollObservation::Failed(e.to_string()),
            Ok(Ok(Some(receipt))) => PollObservation::Receipt(receipt),
            Ok(Ok(None)) => PollObservation::NotFound,
        }
    }

    pub async fn run(&self, tx: MonitoredTransaction, guard: &SessionGuard) -> MonitorOutcome {
        let (progress, _) = watch::channel(tx.clone());
        self.run_with_progress(tx, guard, &progress).await
    }

    /// Run to a terminal outcome, publishing the value object after every step.
    pub async fn run_with_progress(
        &self,
        mut tx: MonitoredTransaction,
        guard: &SessionGuard,
        progress: &watch::Sender<MonitoredTransaction>,
    ) -> MonitorOutcome {
        let initial_delay = tx.submit();
        progress.send_replace(tx.clone());
        log::info!(
            "Monitoring {:?} on chain {}, first poll in {}s",
            tx.tx_hash,
            tx.chain_id,
            initial_delay.as_secs()
        );
        sleep(initial_delay).await;
        tx.begin_polling();
        progress.send_replace(tx.clone());

        loop {
            if !guard.is_active() {
                log::info!("Session closed, abandoning {:?} after {} attempts", tx.tx_hash, tx.attempts);
                return MonitorOutcome::Abandoned { attempts: tx.attempts };
            }

            let observation = self.poll_once(&tx).await;

            if !guard.is_active() {
                log::info!("Session closed, abandoning {:?} after {} attempts", tx.tx_hash, tx.attempts);
                return MonitorOutcome::Abandoned { attempts: tx.attempts };
            }

            let step = tx.advance(observation);
            progress.send_replace(tx.clone());

            match step {
                MonitorStep::Wait(interval) => {
                    match &tx.last_error {
                        Some(error) => log::warn!(
                            "Receipt poll {}/{} for {:?} failed: {}",
                            tx.attempts,
                            tx.max_attempts,
                            tx.tx_hash,
                            error
                        ),
                        None => log::debug!(
                            "Receipt for {:?} not available yet ({}/{})",
                            tx.tx_hash,
                            tx.attempts,
                            tx.max_attempts
                        ),
                    }
                    sleep(interval).await;
                }
                MonitorStep::Confirmed(receipt) => {
                    log::info!(
                        "Transaction {:?} confirmed in block {:?} after {} attempts",
                        tx.tx_hash,
                        receipt.block_number,
                        tx.attempts
                    );
                    return MonitorOutcome::Confirmed { receipt, attempts: tx.attempts };
                }
                MonitorStep::TimedOut => {
                    log::warn!("Transaction {:?} not confirmed after {} attempts", tx.tx_hash, tx.attempts);
                    return MonitorOutcome::TimedOut { attempts: tx.attempts };
                }
                MonitorStep::Finished => {
                    return match tx.state {
                        MonitorState::TimedOut => MonitorOutcome::TimedOut { attempts: tx.attempts },
                        _ => MonitorOutcome::Abandoned { attempts: tx.attempts },
                    };
                }
            }
        }
    }
}
