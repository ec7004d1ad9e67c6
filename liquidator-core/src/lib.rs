//! Liquidator Core
//!
//! Portfolio sync and swap confirmation tracking for the wallet liquidation
//! dashboard.
//!
//! ## Architecture
//!
//! - **Core**: endpoint probing, balance reads, network switching,
//!   transaction monitoring, cache reconciliation, notifications
//! - **Domain**: entities and the storage port
//! - **Application**: ports to the wallet, nodes and portfolio API, and the
//!   wallet, portfolio and liquidation use cases
//! - **Infrastructure**: file storage, ethers adapters, DeBank client, configuration
//! - **Shared**: errors, constants and formatting helpers
//!
//! ## Usage
//!
//! ```no_run
//! use liquidator_core::{init_liquidator_core, LiquidatorConfig};
//!
//! # async fn run() -> Result<(), liquidator_core::LiquidatorError> {
//! let core = init_liquidator_core(LiquidatorConfig::load()?).await?;
//!
//! let wallet = core.wallet.connect().await?;
//! core.portfolio.connect(&wallet).await?;
//! let view = core.portfolio.view(&Default::default()).await;
//! println!("{} tokens worth {}", view.token_count, view.total_value);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub mod application;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod shared;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

use crate::application::ports::{NodeConnector, PortfolioSource, WalletProvider};
use crate::core::{
    BalanceReader, CacheReconciler, EndpointProber, NetworkSwitchCoordinator, NotificationQueue, TransactionMonitor,
};
use crate::domain::repositories::portfolio_repository::PortfolioStore;
use crate::domain::repositories::storage_repository::StorageRepository;

// Re-export the main components
pub use application::use_cases::{
    LiquidationService, PortfolioFilter, PortfolioOrigin, PortfolioService, PortfolioView, SwapRequest,
    SwapSubmission, WalletSession,
};
pub use crate::core::{MonitorOutcome, SessionGuard};
pub use domain::entities::{NetworkDescriptor, NetworkRegistry, TokenBalance, TokenIdentity};
pub use infrastructure::{DebankClient, EthersConnector, FileStorage, JsonRpcWallet, LiquidatorConfig, MemoryStorage};
pub use shared::error::{LiquidatorError, LiquidatorResult};
pub use shared::types::{Notification, NotificationKind, SortKey, SortOrder};
pub use ethers::types::{Address, H256, U256};

/// Install the `env_logger` backend for binaries that use the core alone.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The wired-up dashboard backend
pub struct LiquidatorCore {
    pub config: LiquidatorConfig,
    pub prober: Arc<EndpointProber>,
    pub notifications: Arc<NotificationQueue>,
    pub wallet: WalletSession,
    pub portfolio: PortfolioService,
    pub liquidation: Arc<LiquidationService>,
}

impl LiquidatorCore {
    /// Wire the components over the given adapters.
    pub async fn assemble(
        config: LiquidatorConfig,
        storage: Arc<dyn StorageRepository>,
        wallet: Arc<dyn WalletProvider>,
        connector: Arc<dyn NodeConnector>,
        source: Arc<dyn PortfolioSource>,
    ) -> Result<Self, LiquidatorError> {
        let store = PortfolioStore::new(storage);
        if let Some(key) = config.portfolio_api_key.as_deref() {
            if store.api_key().await?.is_none() {
                log::info!("Seeding the portfolio API access key from configuration");
                store.set_api_key(key).await?;
            }
        }

        let timeouts = &config.timeouts;
        let prober = Arc::new(EndpointProber::new(config.endpoint_set()?, connector).with_probe_timeout(timeouts.probe()));
        let notifications = Arc::new(NotificationQueue::new());
        let portfolio = PortfolioService::new(source, store.clone(), notifications.clone());

        let liquidation = Arc::new(LiquidationService::new(
            NetworkSwitchCoordinator::new(wallet.clone()).with_settle_delay(timeouts.switch_settle()),
            TransactionMonitor::new(prober.clone())
                .with_policy(config.monitor_policy())
                .with_receipt_timeout(timeouts.receipt()),
            BalanceReader::new(prober.clone()).with_timeouts(timeouts.call(), timeouts.retry_delay()),
            CacheReconciler::new(store.clone()),
            store,
            portfolio.state(),
            notifications.clone(),
        ));

        Ok(Self {
            prober,
            notifications,
            wallet: WalletSession::new(wallet),
            portfolio,
            liquidation,
            config,
        })
    }
}

/// Build the core over the real adapters described by `config`.
pub async fn init_liquidator_core(config: LiquidatorConfig) -> Result<LiquidatorCore, LiquidatorError> {
    let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
    let wallet = Arc::new(JsonRpcWallet::new(&config.wallet_rpc_url)?);
    let connector = Arc::new(EthersConnector::new()?);
    let source = Arc::new(DebankClient::new(config.portfolio_api_url.clone()).with_timeout(config.timeouts.portfolio_request()));

    log::info!(
        "Initializing {} {} with data in {}",
        NAME,
        VERSION,
        config.data_dir.display()
    );
    LiquidatorCore::assemble(config, storage, wallet, connector, source).await
}
