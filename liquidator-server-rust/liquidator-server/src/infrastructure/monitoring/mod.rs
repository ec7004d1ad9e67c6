pub mod manager;

pub use manager::{DashboardMetrics, MonitoringManager};
