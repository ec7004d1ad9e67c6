pub mod liquidation;
pub mod portfolio;
pub mod system;
