use chrono::{DateTime, Utc};
use liquidator_core::MonitorOutcome;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt::Write;
use tokio::sync::RwLock;

const RESPONSE_TIME_WINDOW: usize = 1000;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardMetrics {
    pub requests_total: u64,
    pub requests_successful: u64,
    pub requests_failed: u64,
    pub response_time_avg_ms: f64,
    pub wallet_connections: u64,
    pub portfolio_refreshes: u64,
    pub portfolio_refresh_failures: u64,
    pub swap_sessions_opened: u64,
    pub swap_submissions: u64,
    pub swap_submissions_rejected: u64,
    pub swaps_confirmed: u64,
    pub swaps_reverted: u64,
    pub swaps_timed_out: u64,
    pub swaps_abandoned: u64,
    pub uptime_seconds: f64,
}

/// In-process counters for the dashboard backend
#[derive(Debug)]
pub struct MonitoringManager {
    metrics: RwLock<DashboardMetrics>,
    response_times: RwLock<VecDeque<f64>>,
    start_time: DateTime<Utc>,
}

impl Default for MonitoringManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitoringManager {
    pub fn new() -> Self {
        Self {
            metrics: RwLock::new(DashboardMetrics::default()),
            response_times: RwLock::new(VecDeque::with_capacity(RESPONSE_TIME_WINDOW)),
            start_time: Utc::now(),
        }
    }

    pub async fn increment_metric(&self, metric_name: &str) {
        let mut metrics = self.metrics.write().await;

        match metric_name {
            "requests_total" => metrics.requests_total += 1,
            "requests_successful" => metrics.requests_successful += 1,
            "requests_failed" => metrics.requests_failed += 1,
            "wallet_connections" => metrics.wallet_connections += 1,
            "portfolio_refreshes" => metrics.portfolio_refreshes += 1,
            "portfolio_refresh_failures" => metrics.portfolio_refresh_failures += 1,
            "swap_sessions_opened" => metrics.swap_sessions_opened += 1,
            "swap_submissions" => metrics.swap_submissions += 1,
            "swap_submissions_rejected" => metrics.swap_submissions_rejected += 1,
            "swaps_confirmed" => metrics.swaps_confirmed += 1,
            "swaps_reverted" => metrics.swaps_reverted += 1,
            "swaps_timed_out" => metrics.swaps_timed_out += 1,
            "swaps_abandoned" => metrics.swaps_abandoned += 1,
            _ => log::warn!("Unknown metric: {metric_name}"),
        }
    }

    pub async fn record_outcome(&self, outcome: &MonitorOutcome) {
        let metric = match outcome {
            MonitorOutcome::Confirmed { receipt, .. } if receipt.is_reverted() => "swaps_reverted",
            MonitorOutcome::Confirmed { .. } => "swaps_confirmed",
            MonitorOutcome::TimedOut { .. } => "swaps_timed_out",
            MonitorOutcome::Abandoned { .. } => "swaps_abandoned",
        };
        self.increment_metric(metric).await;
    }

    pub async fn record_response_time(&self, response_time_ms: f64) {
        let mut response_times = self.response_times.write().await;
        if response_times.len() == RESPONSE_TIME_WINDOW {
            response_times.pop_front();
        }
        response_times.push_back(response_time_ms);

        let mut metrics = self.metrics.write().await;
        metrics.response_time_avg_ms = response_times.iter().sum::<f64>() / response_times.len() as f64;
    }

    pub async fn get_metrics(&self) -> DashboardMetrics {
        let mut metrics = self.metrics.read().await.clone();
        metrics.uptime_seconds = self.uptime_seconds();
        metrics
    }

    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_milliseconds() as f64 / 1000.0
    }

    /// Render the counters in the Prometheus text exposition format.
    pub async fn render_prometheus(&self) -> String {
        let metrics = self.get_metrics().await;
        let series: [(&str, &str, &str, f64); 15] = [
            ("requests_total", "counter", "Total number of API requests", metrics.requests_total as f64),
            ("requests_successful_total", "counter", "API requests answered with 2xx", metrics.requests_successful as f64),
            ("requests_failed_total", "counter", "API requests answered with an error", metrics.requests_failed as f64),
            ("response_time_avg_ms", "gauge", "Average response time over the last 1000 requests", metrics.response_time_avg_ms),
            ("wallet_connections_total", "counter", "Wallet connections", metrics.wallet_connections as f64),
            ("portfolio_refreshes_total", "counter", "Successful portfolio API refreshes", metrics.portfolio_refreshes as f64),
            ("portfolio_refresh_failures_total", "counter", "Failed portfolio API refreshes", metrics.portfolio_refresh_failures as f64),
            ("swap_sessions_opened_total", "counter", "Swap sessions opened", metrics.swap_sessions_opened as f64),
            ("swap_submissions_total", "counter", "Swap submissions accepted for monitoring", metrics.swap_submissions as f64),
            ("swap_submissions_rejected_total", "counter", "Swap submissions rejected", metrics.swap_submissions_rejected as f64),
            ("swaps_confirmed_total", "counter", "Monitored swaps confirmed", metrics.swaps_confirmed as f64),
            ("swaps_reverted_total", "counter", "Monitored swaps mined but reverted", metrics.swaps_reverted as f64),
            ("swaps_timed_out_total", "counter", "Monitored swaps that ran out of attempts", metrics.swaps_timed_out as f64),
            ("swaps_abandoned_total", "counter", "Monitored swaps abandoned by closing the session", metrics.swaps_abandoned as f64),
            ("uptime_seconds", "gauge", "Seconds since the server started", metrics.uptime_seconds),
        ];

        let mut out = String::new();
        for (name, kind, help, value) in series {
            let _ = writeln!(out, "# HELP liquidator_{name} {help}");
            let _ = writeln!(out, "# TYPE liquidator_{name} {kind}");
            let _ = writeln!(out, "liquidator_{name} {value}\n");
        }
        out
    }
}
