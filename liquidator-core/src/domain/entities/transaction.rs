//! Monitored transaction entity
//!
//! The attempt counter lives on the value object and only [`MonitoredTransaction::advance`]
//! moves it, so the polling policy can be exercised without timers.

use crate::shared::constants::{
    MIN_CONFIRMATIONS, MONITOR_INITIAL_DELAY, MONITOR_MAX_ATTEMPTS, MONITOR_POLL_INTERVAL,
};
use ethers::types::H256;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing policy for one monitored transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorPolicy {
    pub initial_delay: Duration,
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for MonitorPolicy {
    fn default() -> Self {
        Self {
            initial_delay: MONITOR_INITIAL_DELAY,
            poll_interval: MONITOR_POLL_INTERVAL,
            max_attempts: MONITOR_MAX_ATTEMPTS,
        }
    }
}

/// Where a monitored transaction is in its polling schedule.
///
/// A failed poll has no state of its own: the transaction stays `Polling`
/// and the failure is kept in `MonitoredTransaction::last_error` until the
/// next poll succeeds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Submitted,
    Polling,
    Confirmed,
    TimedOut,
}

impl MonitorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MonitorState::Confirmed | MonitorState::TimedOut)
    }
}

/// What a node reported for a transaction receipt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceiptInfo {
    pub tx_hash: H256,
    pub block_number: Option<u64>,
    /// 1 for success, 0 for a reverted transaction
    pub status: Option<u64>,
    pub confirmations: u64,
}

impl ReceiptInfo {
    pub fn is_reverted(&self) -> bool {
        self.status == Some(0)
    }
}

/// Result of one poll
#[derive(Debug, Clone, PartialEq)]
pub enum PollObservation {
    Receipt(ReceiptInfo),
    NotFound,
    Failed(String),
}

/// What the driver should do next
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorStep {
    Wait(Duration),
    Confirmed(ReceiptInfo),
    TimedOut,
    /// Already in a terminal state; nothing left to do
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitoredTransaction {
    pub tx_hash: H256,
    pub chain_id: u64,
    pub attempts: u32,
    pub max_attempts: u32,
    pub poll_interval: Duration,
    pub initial_delay: Duration,
    pub state: MonitorState,
    pub last_error: Option<String>,
}

impl MonitoredTransaction {
    pub fn new(tx_hash: H256, chain_id: u64, policy: MonitorPolicy) -> Self {
        Self {
            tx_hash,
            chain_id,
            attempts: 0,
            max_attempts: policy.max_attempts,
            poll_interval: policy.poll_interval,
            initial_delay: policy.initial_delay,
            state: MonitorState::Idle,
            last_error: None,
        }
    }

    /// Idle -> Submitted. Returns the delay before the first poll.
    pub fn submit(&mut self) -> Duration {
        if self.state == MonitorState::Idle {
            self.state = MonitorState::Submitted;
        }
        self.initial_delay
    }

    /// Submitted -> Polling
    pub fn begin_polling(&mut self) {
        if self.state == MonitorState::Submitted {
            self.state = MonitorState::Polling;
        }
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }

    /// Fold one poll result into the state. Every observation, including
    /// a failed poll, consumes an attempt.
    pub fn advance(&mut self, observation: PollObservation) -> MonitorStep {
        match self.state {
            MonitorState::Confirmed | MonitorState::TimedOut => {
                return MonitorStep::Finished;
            }
            MonitorState::Idle | MonitorState::Submitted => {
                self.state = MonitorState::Polling;
            }
            MonitorState::Polling => {}
        }

        self.attempts += 1;

        match observation {
            PollObservation::Receipt(receipt) if receipt.confirmations >= MIN_CONFIRMATIONS => {
                self.last_error = None;
                self.state = MonitorState::Confirmed;
                return MonitorStep::Confirmed(receipt);
            }
            PollObservation::Receipt(_) | PollObservation::NotFound => {
                self.last_error = None;
            }
            PollObservation::Failed(error) => {
                self.last_error = Some(error);
            }
        }

        if self.attempts >= self.max_attempts {
            self.state = MonitorState::TimedOut;
            MonitorStep::TimedOut
        } else {
            MonitorStep::Wait(self.poll_interval)
        }
    }
}
