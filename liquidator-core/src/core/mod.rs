//! Core liquidation workflow
//!
//! Endpoint probing, on-chain balance reads, wallet network switching,
//! transaction monitoring and cache reconciliation.

pub mod endpoints;
pub mod balance;
pub mod network;
pub mod monitor;
pub mod reconcile;
pub mod notifications;

pub use balance::{BalanceReader, BalanceSource, OnChainBalance};
pub use endpoints::{EndpointHealth, EndpointProber, LiveEndpoint};
pub use monitor::{MonitorOutcome, SessionGuard, TransactionMonitor};
pub use network::NetworkSwitchCoordinator;
pub use notifications::NotificationQueue;
pub use reconcile::CacheReconciler;
