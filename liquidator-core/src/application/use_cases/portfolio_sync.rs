//! Portfolio sync
//!
//! Loads the connected wallet's token list from the local cache or the
//! portfolio API, and builds filtered, sorted views of it for the dashboard.

use crate::application::ports::{Notifier, PortfolioSource};
use crate::domain::entities::{CachedPortfolio, NetworkRegistry, TokenBalance};
use crate::domain::repositories::portfolio_repository::PortfolioStore;
use crate::shared::constants::DEFAULT_SMALL_VALUE_THRESHOLD;
use crate::shared::error::LiquidatorError;
use crate::shared::types::{Notification, SortKey, SortOrder, WalletAddress};
use crate::shared::utils::{format_token_balance, format_usd, short_address, time_ago};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory dashboard state for the connected wallet
#[derive(Debug, Clone, Default)]
pub struct PortfolioState {
    pub wallet: Option<WalletAddress>,
    pub tokens: Vec<TokenBalance>,
    pub last_updated: Option<DateTime<Utc>>,
}

pub type SharedPortfolio = Arc<RwLock<PortfolioState>>;

/// Where a connect got its tokens from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortfolioOrigin {
    Cache,
    Api,
    /// No cache and no fetch: the access key is missing or the fetch failed
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioFilter {
    /// Chain short name; `None` shows every chain
    pub chain: Option<String>,
    pub show_unverified: bool,
    pub filter_small_values: bool,
    pub threshold: f64,
    pub sort_key: SortKey,
    pub order: SortOrder,
}

impl Default for PortfolioFilter {
    fn default() -> Self {
        Self {
            chain: None,
            show_unverified: false,
            filter_small_values: true,
            threshold: DEFAULT_SMALL_VALUE_THRESHOLD,
            sort_key: SortKey::default(),
            order: SortOrder::default(),
        }
    }
}

impl PortfolioFilter {
    fn admits(&self, token: &TokenBalance) -> bool {
        self.chain.as_deref().map_or(true, |chain| chain.is_empty() || token.chain == chain)
            && (self.show_unverified || token.is_core())
            && (!self.filter_small_values || token.value_usd() >= self.threshold)
    }

    fn sort_value(&self, token: &TokenBalance) -> f64 {
        match self.sort_key {
            SortKey::Value => token.value_usd(),
            SortKey::Price24hChange => token.price_24h_change.unwrap_or(0.0),
        }
    }
}

/// One dashboard row
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioRow {
    pub id: String,
    pub chain: String,
    /// Whether the chain is one the dashboard can switch to
    pub supported: bool,
    pub chain_display_name: Option<String>,
    pub chain_logo: Option<String>,
    pub name: String,
    pub symbol: String,
    pub short_id: String,
    pub logo_url: Option<String>,
    pub is_core: bool,
    pub amount: f64,
    pub balance: String,
    pub price: f64,
    pub price_24h_change_pct: Option<String>,
    pub value_usd: f64,
    pub value: String,
    pub liquidatable: bool,
    pub token_url: Option<String>,
    pub holder_url: Option<String>,
}

impl PortfolioRow {
    fn build(token: &TokenBalance, wallet: &str) -> Self {
        let network = NetworkRegistry::by_name(&token.chain);
        Self {
            id: token.id.clone(),
            chain: token.chain.clone(),
            supported: network.is_some(),
            chain_display_name: network.map(|n| n.display_name.to_string()),
            chain_logo: network.map(|n| n.logo.to_string()),
            name: token.name.clone(),
            symbol: token.label().to_string(),
            short_id: short_address(&token.id),
            logo_url: token.logo_url.clone(),
            is_core: token.is_core(),
            amount: token.amount,
            balance: format_token_balance(token.amount),
            price: token.price,
            price_24h_change_pct: token
                .price_24h_change
                .filter(|change| *change != 0.0)
                .map(|change| format!("{:.2}%", change * 100.0)),
            value_usd: token.value_usd(),
            value: format_usd(token.value_usd()),
            liquidatable: token.amount > 0.0,
            token_url: network.map(|n| n.token_url(&token.id)),
            holder_url: network.map(|n| n.token_holder_url(&token.id, wallet)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioView {
    pub wallet: Option<WalletAddress>,
    pub rows: Vec<PortfolioRow>,
    pub total_value_usd: f64,
    pub total_value: String,
    pub token_count: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_updated_ago: Option<String>,
}

pub struct PortfolioService {
    source: Arc<dyn PortfolioSource>,
    store: PortfolioStore,
    notifier: Arc<dyn Notifier>,
    state: SharedPortfolio,
}

impl PortfolioService {
    pub fn new(source: Arc<dyn PortfolioSource>, store: PortfolioStore, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            source,
            store,
            notifier,
            state: Arc::new(RwLock::new(PortfolioState::default())),
        }
    }

    pub fn state(&self) -> SharedPortfolio {
        self.state.clone()
    }

    pub fn store(&self) -> &PortfolioStore {
        &self.store
    }

    /// Adopt `wallet`, preferring its cached portfolio over an API fetch.
    ///
    /// A missing access key or a failed fetch leaves the list empty; the
    /// failure itself is reported through the notifier.
    pub async fn connect(&self, wallet: &str) -> Result<PortfolioOrigin, LiquidatorError> {
        let cached = self.store.load_portfolio(wallet).await?;
        {
            let mut state = self.state.write().await;
            state.wallet = Some(wallet.to_string());
            state.tokens.clear();
            state.last_updated = None;
            if let Some(cached) = cached {
                log::info!("Loaded {} cached tokens for {}", cached.tokens.len(), wallet);
                state.tokens = cached.tokens;
                state.last_updated = Some(cached.last_updated);
                return Ok(PortfolioOrigin::Cache);
            }
        }

        if self.store.api_key().await?.is_none() {
            log::info!("No portfolio API access key set, skipping fetch for {}", wallet);
            return Ok(PortfolioOrigin::Unavailable);
        }

        match self.refresh().await {
            Ok(_) => Ok(PortfolioOrigin::Api),
            Err(LiquidatorError::Storage(message)) => Err(LiquidatorError::Storage(message)),
            Err(_) => Ok(PortfolioOrigin::Unavailable),
        }
    }

    pub async fn disconnect(&self) {
        *self.state.write().await = PortfolioState::default();
    }

    /// Refetch the token list from the portfolio API and persist it.
    ///
    /// A failed fetch empties the list and raises an error notice.
    pub async fn refresh(&self) -> Result<usize, LiquidatorError> {
        let wallet = self
            .state
            .read()
            .await
            .wallet
            .clone()
            .ok_or_else(|| LiquidatorError::validation("No wallet connected"))?;
        let access_key = self
            .store
            .api_key()
            .await?
            .ok_or_else(|| LiquidatorError::validation("Portfolio API access key is not set"))?;

        match self.source.fetch_tokens(&wallet, &access_key).await {
            Ok(tokens) => {
                let portfolio = CachedPortfolio::new(tokens);
                self.store.save_portfolio(&wallet, &portfolio).await?;

                let count = portfolio.tokens.len();
                let mut state = self.state.write().await;
                if !Self::still_connected(&state, &wallet) {
                    log::info!("Wallet changed while fetching {}, cached its {} tokens only", wallet, count);
                    return Ok(count);
                }
                state.tokens = portfolio.tokens;
                state.last_updated = Some(portfolio.last_updated);
                log::info!("Fetched {} tokens for {}", count, wallet);
                Ok(count)
            }
            Err(e) => {
                let mut state = self.state.write().await;
                if Self::still_connected(&state, &wallet) {
                    state.tokens.clear();
                }
                drop(state);
                self.notifier
                    .notify(Notification::error(format!("Failed to fetch token data. Err: {}", e)));
                Err(e)
            }
        }
    }

    fn still_connected(state: &PortfolioState, wallet: &str) -> bool {
        state
            .wallet
            .as_deref()
            .is_some_and(|current| current.eq_ignore_ascii_case(wallet))
    }

    pub async fn set_api_key(&self, key: &str) -> Result<(), LiquidatorError> {
        self.store.set_api_key(key).await
    }

    pub async fn api_key(&self) -> Result<Option<String>, LiquidatorError> {
        self.store.api_key().await
    }

    pub async fn view(&self, filter: &PortfolioFilter) -> PortfolioView {
        let state = self.state.read().await;
        let wallet = state.wallet.clone().unwrap_or_default();

        let mut tokens: Vec<&TokenBalance> = state.tokens.iter().filter(|t| filter.admits(t)).collect();
        tokens.sort_by(|a, b| {
            let ordering = filter
                .sort_value(a)
                .partial_cmp(&filter.sort_value(b))
                .unwrap_or(Ordering::Equal);
            match filter.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total_value_usd: f64 = tokens.iter().map(|t| t.value_usd()).sum();
        PortfolioView {
            wallet: state.wallet.clone(),
            rows: tokens.iter().map(|t| PortfolioRow::build(t, &wallet)).collect(),
            total_value_usd,
            total_value: format_usd(total_value_usd),
            token_count: tokens.len(),
            last_updated: state.last_updated,
            last_updated_ago: state.last_updated.map(|at| time_ago(at, Utc::now())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notifications::NotificationQueue;
    use crate::domain::entities::token::sample_token;
    use crate::infrastructure::platform::MemoryStorage;
    use crate::shared::types::NotificationKind;
    use crate::testing::FakePortfolioSource;
    use std::sync::atomic::Ordering as AtomicOrdering;

    const WALLET: &str = "0xABC0000000000000000000000000000000000001";

    struct Fixture {
        source: Arc<FakePortfolioSource>,
        store: PortfolioStore,
        notices: Arc<NotificationQueue>,
        service: PortfolioService,
    }

    fn fixture(answers: Vec<Result<Vec<TokenBalance>, LiquidatorError>>) -> Fixture {
        let source = Arc::new(FakePortfolioSource::new(answers));
        let store = PortfolioStore::new(Arc::new(MemoryStorage::new()));
        let notices = Arc::new(NotificationQueue::new());
        let service = PortfolioService::new(source.clone(), store.clone(), notices.clone());
        Fixture { source, store, notices, service }
    }

    fn holdings() -> Vec<TokenBalance> {
        let mut pepe = sample_token("PEPE", "eth", 1_000_000.0, 18, 0.00001);
        pepe.is_core = Some(false);
        let mut link = sample_token("LINK", "eth", 3.0, 18, 12.0);
        link.price_24h_change = Some(0.05);
        let mut usdc = sample_token("USDC", "matic", 250.0, 6, 1.0);
        usdc.price_24h_change = Some(-0.001);
        let dust = sample_token("DAI", "eth", 2.0, 18, 1.0);
        let odd = sample_token("ODD", "unknownchain", 50.0, 18, 1.0);
        vec![pepe, link, usdc, dust, odd]
    }

    #[tokio::test]
    async fn test_connect_prefers_cached_blob() {
        let f = fixture(vec![]);
        let cached = CachedPortfolio::new(holdings());
        f.store.save_portfolio(WALLET, &cached).await.unwrap();

        assert_eq!(f.service.connect(WALLET).await.unwrap(), PortfolioOrigin::Cache);

        let state = f.service.state();
        let state = state.read().await;
        assert_eq!(state.tokens.len(), 5);
        assert_eq!(state.last_updated, Some(cached.last_updated));
        assert_eq!(f.source.calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_connect_without_cache_fetches_and_persists() {
        let f = fixture(vec![Ok(holdings())]);
        f.service.set_api_key("key").await.unwrap();

        assert_eq!(f.service.connect(WALLET).await.unwrap(), PortfolioOrigin::Api);

        let persisted = f.store.load_portfolio(WALLET).await.unwrap().unwrap();
        assert_eq!(persisted.tokens.len(), 5);
        assert!(f.service.state().read().await.last_updated.is_some());
        assert_eq!(f.source.calls.load(AtomicOrdering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_connect_without_cache_or_key_stays_empty() {
        let f = fixture(vec![Ok(holdings())]);

        assert_eq!(f.service.connect(WALLET).await.unwrap(), PortfolioOrigin::Unavailable);
        assert!(f.service.state().read().await.tokens.is_empty());
        assert_eq!(f.source.calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_connect_with_failing_api_notifies() {
        let f = fixture(vec![Err(LiquidatorError::portfolio_api("Too Many Requests"))]);
        f.service.set_api_key("key").await.unwrap();

        assert_eq!(f.service.connect(WALLET).await.unwrap(), PortfolioOrigin::Unavailable);
        assert_eq!(f.notices.drain()[0].message, "Failed to fetch token data. Err: Too Many Requests");
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_tokens_and_notifies() {
        let f = fixture(vec![Ok(holdings()), Err(LiquidatorError::portfolio_api("Invalid AccessKey"))]);
        f.service.set_api_key("key").await.unwrap();
        f.service.connect(WALLET).await.unwrap();

        let result = f.service.refresh().await;

        assert_eq!(result.unwrap_err(), LiquidatorError::portfolio_api("Invalid AccessKey"));
        assert!(f.service.state().read().await.tokens.is_empty());
        let notices = f.notices.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NotificationKind::Error);
        assert_eq!(notices[0].message, "Failed to fetch token data. Err: Invalid AccessKey");
        // the previous good blob is kept
        assert_eq!(f.store.load_portfolio(WALLET).await.unwrap().unwrap().tokens.len(), 5);
    }

    /// Answers with `tokens`, but only after the dashboard has moved on to `next_wallet`.
    struct WalletSwitchingSource {
        state: std::sync::OnceLock<SharedPortfolio>,
        next_wallet: &'static str,
        tokens: Vec<TokenBalance>,
    }

    #[async_trait::async_trait]
    impl PortfolioSource for WalletSwitchingSource {
        async fn fetch_tokens(&self, _wallet: &str, _access_key: &str) -> Result<Vec<TokenBalance>, LiquidatorError> {
            if let Some(state) = self.state.get() {
                let mut state = state.write().await;
                state.wallet = Some(self.next_wallet.to_string());
                state.tokens = vec![sample_token("USDC", "eth", 500.0, 6, 1.0)];
            }
            Ok(self.tokens.clone())
        }
    }

    #[tokio::test]
    async fn test_refresh_for_previous_wallet_leaves_current_wallet_alone() {
        const OTHER: &str = "0xdef0000000000000000000000000000000000002";
        let source = Arc::new(WalletSwitchingSource {
            state: std::sync::OnceLock::new(),
            next_wallet: OTHER,
            tokens: holdings(),
        });
        let store = PortfolioStore::new(Arc::new(MemoryStorage::new()));
        let service = PortfolioService::new(source.clone(), store.clone(), Arc::new(NotificationQueue::new()));
        service.set_api_key("key").await.unwrap();
        service.state().write().await.wallet = Some(WALLET.to_string());
        assert!(source.state.set(service.state()).is_ok());

        assert_eq!(service.refresh().await.unwrap(), 5);

        let state = service.state();
        let state = state.read().await;
        assert_eq!(state.wallet.as_deref(), Some(OTHER));
        assert_eq!(state.tokens.len(), 1);
        assert_eq!(state.tokens[0].amount, 500.0);
        assert_eq!(store.load_portfolio(WALLET).await.unwrap().unwrap().tokens.len(), 5);
    }

    #[tokio::test]
    async fn test_refresh_requires_wallet_and_key() {
        let f = fixture(vec![Ok(holdings())]);
        assert!(matches!(f.service.refresh().await, Err(LiquidatorError::Validation(_))));

        f.service.state().write().await.wallet = Some(WALLET.to_string());
        assert!(matches!(f.service.refresh().await, Err(LiquidatorError::Validation(_))));
        assert_eq!(f.source.calls.load(AtomicOrdering::SeqCst), 0);
        assert!(f.notices.is_empty());
    }

    #[tokio::test]
    async fn test_default_view_hides_unverified_and_small_values() {
        let f = fixture(vec![]);
        f.store.save_portfolio(WALLET, &CachedPortfolio::new(holdings())).await.unwrap();
        f.service.connect(WALLET).await.unwrap();

        let view = f.service.view(&PortfolioFilter::default()).await;

        let symbols: Vec<&str> = view.rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["LINK", "ODD", "USDC"]);
        assert_eq!(view.token_count, 3);
        assert!((view.total_value_usd - 336.0).abs() < 1e-9);
        assert_eq!(view.total_value, "$336.00");
        assert!(view.last_updated_ago.unwrap().ends_with("seconds ago"));
    }

    #[tokio::test]
    async fn test_view_filters_and_sorts() {
        let f = fixture(vec![]);
        f.store.save_portfolio(WALLET, &CachedPortfolio::new(holdings())).await.unwrap();
        f.service.connect(WALLET).await.unwrap();

        let view = f
            .service
            .view(&PortfolioFilter {
                show_unverified: true,
                filter_small_values: false,
                sort_key: SortKey::Value,
                order: SortOrder::Asc,
                ..PortfolioFilter::default()
            })
            .await;
        let symbols: Vec<&str> = view.rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["DAI", "PEPE", "LINK", "ODD", "USDC"]);

        let view = f
            .service
            .view(&PortfolioFilter {
                chain: Some("matic".to_string()),
                ..PortfolioFilter::default()
            })
            .await;
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].price_24h_change_pct.as_deref(), Some("-0.10%"));
    }

    #[tokio::test]
    async fn test_rows_flag_unsupported_chains() {
        let f = fixture(vec![]);
        f.store.save_portfolio(WALLET, &CachedPortfolio::new(holdings())).await.unwrap();
        f.service.connect(WALLET).await.unwrap();

        let view = f.service.view(&PortfolioFilter::default()).await;
        let odd = view.rows.iter().find(|r| r.symbol == "ODD").unwrap();
        assert!(!odd.supported);
        assert!(odd.token_url.is_none());

        let link = view.rows.iter().find(|r| r.symbol == "LINK").unwrap();
        assert!(link.supported);
        assert!(link.liquidatable);
        assert_eq!(
            link.holder_url.as_deref(),
            Some(format!("https://etherscan.io/token/{}?a={}", link.id, WALLET).as_str())
        );
    }
}
