//! Domain repositories
//!
//! This module contains the storage port and the typed repository
//! built on it, following Domain-Driven Design principles.

pub mod storage_repository;
pub mod portfolio_repository;

// Re-export repositories
pub use storage_repository::*;
pub use portfolio_repository::*;
