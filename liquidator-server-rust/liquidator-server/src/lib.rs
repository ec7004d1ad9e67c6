//! HTTP backend of the liquidation dashboard.
//!
//! Serves the portfolio view, swap sessions and notifications on top of
//! `liquidator-core`, plus `/health` and Prometheus-format `/metrics`.

pub mod api;
pub mod domain;
pub mod infrastructure;
pub mod middleware;

#[cfg(test)]
pub(crate) mod test_support;
