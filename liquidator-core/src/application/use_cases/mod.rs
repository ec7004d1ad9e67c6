//! Application use cases
//!
//! Orchestrate the core components for the dashboard: wallet connection,
//! portfolio sync and the liquidation session.

pub mod wallet_session;
pub mod portfolio_sync;
pub mod liquidation;

pub use liquidation::*;
pub use portfolio_sync::*;
pub use wallet_session::*;
