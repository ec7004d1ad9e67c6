//! Handler test harness over the core's scripted fakes.

use crate::infrastructure::monitoring::MonitoringManager;
use liquidator_core::domain::entities::token::sample_token;
use liquidator_core::domain::entities::{CachedPortfolio, ReceiptInfo};
use liquidator_core::infrastructure::config::{EndpointList, TimeoutConfig};
use liquidator_core::testing::{FakeConnector, FakeNode, FakePortfolioSource, FakeWallet};
use liquidator_core::{LiquidatorConfig, LiquidatorCore, LiquidatorError, MemoryStorage, TokenBalance, H256};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub const WALLET: &str = "0xAbC0000000000000000000000000000000000001";
pub const TX_HASH: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
const NODE_URL: &str = "https://eth-node";

pub struct Harness {
    pub core: Arc<LiquidatorCore>,
    pub monitoring: Arc<MonitoringManager>,
    pub wallet: Arc<FakeWallet>,
}

impl Harness {
    pub async fn new() -> Self {
        Self::build(FakeWallet::new(&[WALLET]), FakeNode::healthy(), vec![Ok(Self::tokens())]).await
    }

    pub async fn with_node(node: FakeNode) -> Self {
        Self::build(FakeWallet::new(&[WALLET]), node, vec![Ok(Self::tokens())]).await
    }

    pub async fn with_portfolio_answers(answers: Vec<Result<Vec<TokenBalance>, LiquidatorError>>) -> Self {
        Self::build(FakeWallet::new(&[WALLET]), FakeNode::healthy(), answers).await
    }

    pub async fn refusing_switch() -> Self {
        Self::build(
            FakeWallet::new(&[WALLET]).refusing_switch(),
            FakeNode::healthy(),
            vec![Ok(Self::tokens())],
        )
        .await
    }

    async fn build(
        wallet: FakeWallet,
        node: FakeNode,
        answers: Vec<Result<Vec<TokenBalance>, LiquidatorError>>,
    ) -> Self {
        let mut config = LiquidatorConfig {
            portfolio_api_key: Some("test-key".to_string()),
            timeouts: TimeoutConfig {
                switch_settle_ms: 0,
                monitor_initial_delay_ms: 0,
                monitor_poll_interval_ms: 10,
                monitor_max_attempts: 500,
                ..TimeoutConfig::default()
            },
            ..LiquidatorConfig::default()
        };
        config
            .rpc_endpoints
            .insert("1".to_string(), EndpointList::One(NODE_URL.to_string()));

        let wallet = Arc::new(wallet);
        let core = LiquidatorCore::assemble(
            config,
            Arc::new(MemoryStorage::new()),
            wallet.clone(),
            Arc::new(FakeConnector::new().node(NODE_URL, node)),
            Arc::new(FakePortfolioSource::new(answers)),
        )
        .await
        .unwrap();

        Self {
            core: Arc::new(core),
            monitoring: Arc::new(MonitoringManager::new()),
            wallet,
        }
    }

    pub fn usdc() -> TokenBalance {
        sample_token("USDC", "eth", 100.0, 6, 1.0)
    }

    /// USDC worth $100 and LINK worth $36, both on Ethereum
    pub fn tokens() -> Vec<TokenBalance> {
        vec![Self::usdc(), sample_token("LINK", "eth", 3.0, 18, 12.0)]
    }

    pub fn receipt(status: u64) -> ReceiptInfo {
        ReceiptInfo {
            tx_hash: H256::repeat_byte(0x11),
            block_number: Some(19_000_000),
            status: Some(status),
            confirmations: 1,
        }
    }

    pub async fn cached_portfolio(&self) -> Option<CachedPortfolio> {
        self.core.portfolio.store().load_portfolio(WALLET).await.unwrap()
    }
}

/// Poll `condition` until it holds, failing the test after two seconds.
pub async fn wait_until<F, Fut>(condition: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..200 {
        if condition().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

/// An initialized test service over `harness`, wired like the real server.
macro_rules! test_app {
    ($harness:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($harness.core.clone()))
                .app_data(actix_web::web::Data::new($harness.monitoring.clone()))
                .wrap(crate::middleware::metrics::MetricsMiddleware::new($harness.monitoring.clone()))
                .configure(crate::api::configure),
        )
        .await
    };
}

pub(crate) use test_app;
