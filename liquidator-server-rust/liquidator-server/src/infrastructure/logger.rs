use crate::infrastructure::config::ServerConfig;
use liquidator_core::MonitorOutcome;
use std::fs;
use std::sync::{Once, OnceLock};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling, rolling::Rotation};
use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

static INIT: Once = Once::new();
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub log_directory: String,
    pub file_prefix: String,
    pub enable_console: bool,
    pub enable_file: bool,
    pub enable_colors: bool,
    pub enable_thread_ids: bool,
    pub enable_file_line: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_directory: "logs".to_string(),
            file_prefix: "liquidator_server.log".to_string(),
            enable_console: true,
            enable_file: true,
            enable_colors: true,
            enable_thread_ids: false,
            enable_file_line: true,
        }
    }
}

impl From<&ServerConfig> for LogConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            level: config.log_level.clone(),
            log_directory: config.log_directory.clone(),
            enable_file: config.enable_file_logging,
            enable_colors: config.environment != "production",
            ..Self::default()
        }
    }
}

impl LogConfig {
    /// `RUST_LOG` wins; otherwise both crates log at the configured level.
    pub fn filter_directives(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| {
            let level = match self.level.to_lowercase().as_str() {
                level @ ("trace" | "debug" | "info" | "warn" | "error") => level.to_string(),
                _ => "info".to_string(),
            };
            format!("liquidator_server={level},liquidator_core={level},actix_web=info")
        })
    }
}

/// Tracing setup for the server: console output plus a daily-rolling file.
///
/// Records emitted through the `log` facade, which is how `liquidator-core`
/// logs, are forwarded into the same subscriber.
pub struct Logger;

impl Logger {
    pub fn init(config: &LogConfig) {
        INIT.call_once(|| {
            if config.enable_file {
                if let Err(e) = fs::create_dir_all(&config.log_directory) {
                    eprintln!("Failed to create log directory: {e}");
                }
            }

            let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

            if config.enable_console {
                let console_layer = fmt::layer()
                    .with_timer(UtcTime::rfc_3339())
                    .with_thread_ids(config.enable_thread_ids)
                    .with_file(config.enable_file_line)
                    .with_line_number(config.enable_file_line)
                    .with_ansi(config.enable_colors)
                    .with_writer(std::io::stdout);
                layers.push(Box::new(console_layer));
            }

            if config.enable_file {
                let file_appender =
                    rolling::RollingFileAppender::new(Rotation::DAILY, &config.log_directory, &config.file_prefix);
                let (writer, guard) = non_blocking(file_appender);
                let _ = FILE_GUARD.set(guard);
                let file_layer = fmt::layer()
                    .with_timer(UtcTime::rfc_3339())
                    .with_thread_ids(config.enable_thread_ids)
                    .with_file(config.enable_file_line)
                    .with_line_number(config.enable_file_line)
                    .with_ansi(false)
                    .with_writer(writer);
                layers.push(Box::new(file_layer));
            }

            let subscriber = Registry::default()
                .with(layers)
                .with(EnvFilter::new(config.filter_directives()));

            if let Err(e) = subscriber.try_init() {
                eprintln!("Failed to install the tracing subscriber: {e}");
            }
        });
    }

    pub fn swap_submitted(tx_hash: &str, chain_id: u64) {
        info!(tx_hash, chain_id, "Swap transaction submitted");
    }

    pub fn swap_finished(tx_hash: &str, outcome: &MonitorOutcome) {
        match outcome {
            MonitorOutcome::Confirmed { receipt, attempts } => {
                info!(tx_hash, attempts, reverted = receipt.is_reverted(), "Swap transaction confirmed")
            }
            MonitorOutcome::TimedOut { attempts } => warn!(tx_hash, attempts, "Swap transaction not confirmed in time"),
            MonitorOutcome::Abandoned { attempts } => info!(tx_hash, attempts, "Swap monitoring abandoned"),
        }
    }

    pub fn portfolio_refreshed(wallet: &str, tokens: usize) {
        info!(wallet, tokens, "Portfolio refreshed");
    }

    pub fn request_failed(code: &str, message: &str) {
        error!(code, message, "Request failed");
    }
}
