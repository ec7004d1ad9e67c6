//! Domain entities and value objects
//!
//! This module contains the core domain entities and value objects
//! that represent the business concepts of the liquidation dashboard.

pub mod token;
pub mod network;
pub mod portfolio;
pub mod transaction;

// Re-export entities
pub use token::*;
pub use network::*;
pub use portfolio::*;
pub use transaction::*;
