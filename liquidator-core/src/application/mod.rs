//! Application layer - use cases and ports
//!
//! The ports describe the external collaborators; the use cases drive the
//! core workflow through them.

pub mod use_cases;
pub mod ports;

// Re-export application components
pub use use_cases::*;
pub use ports::*;
