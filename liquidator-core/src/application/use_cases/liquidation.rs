//! Liquidation session
//!
//! Ties the workflow together for one selected token: switch the wallet to the
//! token's chain, hand the swap widget its request, then follow the submitted
//! transaction to confirmation and fold the new balance back into the cache.

use super::portfolio_sync::SharedPortfolio;
use crate::application::ports::Notifier;
use crate::core::balance::BalanceReader;
use crate::core::monitor::{MonitorOutcome, SessionGuard, TransactionMonitor};
use crate::core::network::NetworkSwitchCoordinator;
use crate::core::reconcile::CacheReconciler;
use crate::domain::entities::{
    destination_tokens, MonitoredTransaction, NetworkDescriptor, NetworkRegistry, ReceiptInfo, Token,
    TokenBalance, TokenIdentity,
};
use crate::domain::repositories::portfolio_repository::PortfolioStore;
use crate::shared::error::LiquidatorError;
use crate::shared::types::{Notification, WalletAddress};
use crate::shared::utils::{format_token_balance, parse_tx_hash, validate_ethereum_address};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

/// What the swap widget is given for the selected token
#[derive(Debug, Clone, Serialize)]
pub struct SwapRequest {
    pub session_id: Uuid,
    pub chain_id: u64,
    pub chain_name: String,
    pub token_in: String,
    pub token_in_symbol: String,
    /// Full balance as a canonical decimal string
    pub amount_in: String,
    pub token_out: Option<String>,
    pub token_out_options: Vec<Token>,
    pub ready: bool,
}

/// The widget's callback once it has sent the swap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapSubmission {
    pub tx_hash: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub wallet: WalletAddress,
    pub chain_id: u64,
    pub token_id: String,
    pub symbol: String,
    pub monitoring: bool,
    pub transaction: Option<MonitoredTransaction>,
    pub outcome: Option<MonitorOutcome>,
}

struct ActiveSession {
    id: Uuid,
    wallet: WalletAddress,
    token: TokenBalance,
    network: NetworkDescriptor,
    guard: SessionGuard,
    monitoring: bool,
    progress: Option<watch::Receiver<MonitoredTransaction>>,
    outcome: Option<MonitorOutcome>,
}

/// A submission that passed validation and owns the session's monitor slot
pub struct AcceptedSubmission {
    session_id: Uuid,
    wallet: WalletAddress,
    token: TokenBalance,
    chain_id: u64,
    guard: SessionGuard,
    transaction: MonitoredTransaction,
    progress: watch::Sender<MonitoredTransaction>,
    metadata: serde_json::Value,
}

impl AcceptedSubmission {
    pub fn transaction(&self) -> &MonitoredTransaction {
        &self.transaction
    }
}

pub struct LiquidationService {
    switcher: NetworkSwitchCoordinator,
    monitor: TransactionMonitor,
    reader: BalanceReader,
    reconciler: CacheReconciler,
    store: PortfolioStore,
    portfolio: SharedPortfolio,
    notifier: Arc<dyn Notifier>,
    session: Mutex<Option<ActiveSession>>,
}

impl LiquidationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        switcher: NetworkSwitchCoordinator,
        monitor: TransactionMonitor,
        reader: BalanceReader,
        reconciler: CacheReconciler,
        store: PortfolioStore,
        portfolio: SharedPortfolio,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            switcher,
            monitor,
            reader,
            reconciler,
            store,
            portfolio,
            notifier,
            session: Mutex::new(None),
        }
    }

    /// Open a swap session for a token of the loaded portfolio.
    ///
    /// Any previous session is closed first, which stops its monitor.
    pub async fn select_token(&self, identity: &TokenIdentity) -> Result<SwapRequest, LiquidatorError> {
        let (wallet, token) = {
            let state = self.portfolio.read().await;
            let wallet = state
                .wallet
                .clone()
                .ok_or_else(|| LiquidatorError::validation("No wallet connected"))?;
            let token = state
                .tokens
                .iter()
                .find(|token| identity.matches(token))
                .cloned()
                .ok_or_else(|| {
                    LiquidatorError::validation(format!(
                        "{} on {} is not in the portfolio",
                        identity.id, identity.chain
                    ))
                })?;
            (wallet, token)
        };

        let network = NetworkRegistry::by_name(&token.chain)
            .ok_or_else(|| LiquidatorError::unsupported_chain(token.chain.clone()))?;
        let amount_in = token.full_balance()?;

        self.close_session().await;
        let ready = self.switcher.switch_to(network.chain_id).await;
        let token_out = self.store.destination_token(&token.chain).await?;

        let session_id = Uuid::new_v4();
        let request = SwapRequest {
            session_id,
            chain_id: network.chain_id,
            chain_name: network.chain_name.to_string(),
            token_in: token.id.clone(),
            token_in_symbol: token.label().to_string(),
            amount_in,
            token_out,
            token_out_options: destination_tokens(&token.chain),
            ready,
        };

        log::info!(
            "Swap session {} opened for {} {} on {}",
            session_id,
            request.amount_in,
            request.token_in_symbol,
            network.display_name
        );
        *self.session.lock().await = Some(ActiveSession {
            id: session_id,
            wallet,
            token,
            network,
            guard: SessionGuard::new(),
            monitoring: false,
            progress: None,
            outcome: None,
        });
        Ok(request)
    }

    /// Remember the destination token the user picked for `chain`
    pub async fn set_destination_token(&self, chain: &str, address: &str) -> Result<(), LiquidatorError> {
        validate_ethereum_address(address)?;
        if NetworkRegistry::by_name(chain).is_none() {
            return Err(LiquidatorError::unsupported_chain(chain));
        }
        self.store.set_destination_token(chain, address).await
    }

    /// Validate a submission and claim the session's monitor slot.
    pub async fn accept_submission(&self, submission: SwapSubmission) -> Result<AcceptedSubmission, LiquidatorError> {
        let tx_hash = parse_tx_hash(&submission.tx_hash)?;

        let mut session = self.session.lock().await;
        let active = session
            .as_mut()
            .ok_or_else(|| LiquidatorError::validation("No active swap session"))?;
        if active.monitoring {
            return Err(LiquidatorError::validation(
                "A submitted transaction is already being monitored",
            ));
        }

        let transaction = self.monitor.track(tx_hash, active.network.chain_id);
        let (progress, watcher) = watch::channel(transaction.clone());
        active.monitoring = true;
        active.progress = Some(watcher);
        active.outcome = None;

        Ok(AcceptedSubmission {
            session_id: active.id,
            wallet: active.wallet.clone(),
            token: active.token.clone(),
            chain_id: active.network.chain_id,
            guard: active.guard.clone(),
            transaction,
            progress,
            metadata: submission.metadata,
        })
    }

    /// Follow an accepted submission to its outcome, then reconcile and notify.
    pub async fn complete_submission(&self, accepted: AcceptedSubmission) -> MonitorOutcome {
        let tx_hash = format!("{:?}", accepted.transaction.tx_hash);
        if !accepted.metadata.is_null() {
            log::debug!("Swap {} submitted with metadata {}", tx_hash, accepted.metadata);
        }

        let outcome = self
            .monitor
            .run_with_progress(accepted.transaction.clone(), &accepted.guard, &accepted.progress)
            .await;

        match &outcome {
            MonitorOutcome::Confirmed { receipt, .. } => {
                self.settle(&accepted, receipt).await;
            }
            MonitorOutcome::TimedOut { attempts } => {
                self.notifier.notify(Notification::error(
                    LiquidatorError::monitor_timed_out(tx_hash.clone(), *attempts).to_string(),
                ));
            }
            MonitorOutcome::Abandoned { .. } => {}
        }

        let mut session = self.session.lock().await;
        if let Some(active) = session.as_mut().filter(|s| s.id == accepted.session_id) {
            active.monitoring = false;
            active.outcome = Some(outcome.clone());
        }
        outcome
    }

    pub async fn track_submission(&self, submission: SwapSubmission) -> Result<MonitorOutcome, LiquidatorError> {
        let accepted = self.accept_submission(submission).await?;
        Ok(self.complete_submission(accepted).await)
    }

    pub async fn close_session(&self) {
        if let Some(session) = self.session.lock().await.take() {
            session.guard.close();
            log::info!("Swap session {} closed", session.id);
        }
    }

    pub async fn status(&self) -> Option<SessionStatus> {
        let session = self.session.lock().await;
        session.as_ref().map(|active| SessionStatus {
            session_id: active.id,
            wallet: active.wallet.clone(),
            chain_id: active.network.chain_id,
            token_id: active.token.id.clone(),
            symbol: active.token.label().to_string(),
            monitoring: active.monitoring,
            transaction: active.progress.as_ref().map(|watcher| watcher.borrow().clone()),
            outcome: active.outcome.clone(),
        })
    }

    async fn settle(&self, accepted: &AcceptedSubmission, receipt: &ReceiptInfo) {
        let token = &accepted.token;
        let balance = match self
            .reader
            .read_balance(&token.id, &accepted.wallet, accepted.chain_id)
            .await
        {
            Ok(balance) => balance,
            Err(e) => {
                self.notifier.notify(Notification::error(format!(
                    "Swap confirmed but the {} balance could not be refreshed: {}",
                    token.label(),
                    e
                )));
                return;
            }
        };

        let reconciled = {
            let mut elsewhere: Vec<TokenBalance> = Vec::new();
            let mut state = self.portfolio.write().await;
            let same_wallet = state
                .wallet
                .as_deref()
                .is_some_and(|wallet| wallet.eq_ignore_ascii_case(&accepted.wallet));
            let tokens: &mut [TokenBalance] = if same_wallet {
                &mut state.tokens
            } else {
                log::info!(
                    "Wallet changed since swap {:?} was submitted, updating the cache of {} only",
                    receipt.tx_hash,
                    accepted.wallet
                );
                &mut elsewhere
            };
            self.reconciler
                .reconcile(&accepted.wallet, tokens, &token.identity(), balance.raw, balance.decimals)
                .await
        };
        if let Err(e) = &reconciled {
            log::error!("Failed to persist the new {} balance: {}", token.label(), e);
        }

        let amount = balance.formatted.parse::<f64>().map(format_token_balance).unwrap_or(balance.formatted);
        if receipt.is_reverted() {
            self.notifier.notify(Notification::error(format!(
                "Swap transaction {:?} reverted. {} balance: {}",
                receipt.tx_hash,
                token.label(),
                amount
            )));
        } else if let Err(e) = reconciled {
            self.notifier.notify(Notification::error(format!(
                "Swap confirmed. {} balance: {}, but the saved portfolio could not be updated: {}",
                token.label(),
                amount,
                e
            )));
        } else {
            self.notifier.notify(Notification::success(format!(
                "Swap confirmed. {} balance: {}",
                token.label(),
                amount
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockWalletProvider;
    use crate::core::endpoints::EndpointProber;
    use crate::core::notifications::NotificationQueue;
    use crate::domain::entities::token::sample_token;
    use crate::domain::entities::CachedPortfolio;
    use crate::infrastructure::platform::MemoryStorage;
    use crate::shared::types::NotificationKind;
    use crate::testing::{endpoint_set, FakeConnector, FakeNode};
    use crate::application::use_cases::portfolio_sync::PortfolioService;
    use crate::application::ports::PortfolioSource;
    use crate::testing::FakePortfolioSource;
    use crate::domain::repositories::storage_repository::StorageRepository;
    use ethers::types::{H256, U256};
    use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
    use std::time::Duration;

    const WALLET: &str = "0xABC0000000000000000000000000000000000001";
    const TX: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";

    struct Fixture {
        store: PortfolioStore,
        notices: Arc<NotificationQueue>,
        portfolio: PortfolioService,
        connector: Arc<FakeConnector>,
        service: Arc<LiquidationService>,
        usdc: TokenBalance,
    }

    fn cooperative_wallet() -> MockWalletProvider {
        let mut wallet = MockWalletProvider::new();
        wallet.expect_switch_chain().returning(|_| Ok(()));
        wallet.expect_chain_id().returning(|| Ok(1));
        wallet
    }

    /// Memory storage whose writes can be switched off mid-test
    #[derive(Default)]
    struct LockableStorage {
        inner: MemoryStorage,
        read_only: AtomicBool,
    }

    #[async_trait::async_trait]
    impl StorageRepository for LockableStorage {
        async fn get(&self, key: &str) -> Result<Option<String>, LiquidatorError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), LiquidatorError> {
            if self.read_only.load(AtomicOrdering::SeqCst) {
                return Err(LiquidatorError::storage("disk full"));
            }
            self.inner.set(key, value).await
        }

        async fn delete(&self, key: &str) -> Result<(), LiquidatorError> {
            self.inner.delete(key).await
        }
    }

    async fn fixture(wallet: MockWalletProvider, node: FakeNode) -> Fixture {
        fixture_on(Arc::new(MemoryStorage::new()), wallet, node).await
    }

    async fn fixture_on(storage: Arc<dyn StorageRepository>, wallet: MockWalletProvider, node: FakeNode) -> Fixture {
        let store = PortfolioStore::new(storage);
        let notices = Arc::new(NotificationQueue::new());
        let source: Arc<dyn PortfolioSource> = Arc::new(FakePortfolioSource::new(vec![]));
        let portfolio = PortfolioService::new(source, store.clone(), notices.clone());

        let usdc = sample_token("USDC", "eth", 100.0, 6, 1.0);
        let link = sample_token("LINK", "eth", 3.0, 18, 12.0);
        store
            .save_portfolio(WALLET, &CachedPortfolio::new(vec![usdc.clone(), link]))
            .await
            .unwrap();
        portfolio.connect(WALLET).await.unwrap();

        let connector = Arc::new(FakeConnector::new().node("https://eth-node", node));
        let prober = Arc::new(EndpointProber::new(endpoint_set(1, &["https://eth-node"]), connector.clone()));
        let service = Arc::new(LiquidationService::new(
            NetworkSwitchCoordinator::new(Arc::new(wallet)),
            TransactionMonitor::new(prober.clone()),
            BalanceReader::new(prober),
            CacheReconciler::new(store.clone()),
            store.clone(),
            portfolio.state(),
            notices.clone(),
        ));

        Fixture { store, notices, portfolio, connector, service, usdc }
    }

    fn receipt(status: u64) -> ReceiptInfo {
        ReceiptInfo {
            tx_hash: H256::repeat_byte(0x11),
            block_number: Some(19_000_000),
            status: Some(status),
            confirmations: 1,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_swap_reconciles_memory_and_cache() {
        let node = FakeNode::healthy()
            .decimals(6)
            .balances(vec![Ok(U256::from(150_250_000u64))])
            .receipts(vec![Ok(None), Ok(None), Ok(Some(receipt(1)))]);
        let f = fixture(cooperative_wallet(), node).await;

        let request = f.service.select_token(&f.usdc.identity()).await.unwrap();
        assert!(request.ready);
        assert_eq!(request.chain_id, 1);
        assert_eq!(request.amount_in, "100.0");
        assert_eq!(request.token_out_options.len(), 4);

        let outcome = f
            .service
            .track_submission(SwapSubmission { tx_hash: TX.to_string(), metadata: serde_json::json!({"route": "1inch"}) })
            .await
            .unwrap();

        assert!(matches!(outcome, MonitorOutcome::Confirmed { attempts: 3, .. }));
        let node = f.connector.get("https://eth-node");
        assert_eq!(FakeNode::count(&node.receipt_calls), 3);
        assert_eq!(FakeNode::count(&node.balance_calls), 1);

        let state = f.portfolio.state();
        let in_memory = state.read().await.tokens[0].clone();
        assert_eq!(in_memory.amount, 150.25);
        assert!(in_memory.is_consistent());

        let blob = f.store.load_portfolio("0xabc0000000000000000000000000000000000001").await.unwrap().unwrap();
        assert_eq!(blob.tokens[0].amount, 150.25);
        assert_eq!(blob.tokens[0].raw_amount_hex_str.as_deref(), Some("0x8f4a210"));

        let notices = f.notices.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NotificationKind::Success);
        assert!(notices[0].message.contains("USDC"));
        assert!(notices[0].message.contains("150.25"));

        let status = f.service.status().await.unwrap();
        assert!(!status.monitoring);
        assert!(matches!(status.outcome, Some(MonitorOutcome::Confirmed { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reverted_swap_still_reconciles_but_reports_error() {
        let node = FakeNode::healthy()
            .decimals(6)
            .balances(vec![Ok(U256::from(100_000_000u64))])
            .receipts(vec![Ok(Some(receipt(0)))]);
        let f = fixture(cooperative_wallet(), node).await;
        f.service.select_token(&f.usdc.identity()).await.unwrap();

        f.service
            .track_submission(SwapSubmission { tx_hash: TX.to_string(), metadata: serde_json::Value::Null })
            .await
            .unwrap();

        let notices = f.notices.drain();
        assert_eq!(notices[0].kind, NotificationKind::Error);
        assert!(notices[0].message.contains("reverted"));
        assert_eq!(FakeNode::count(&f.connector.get("https://eth-node").balance_calls), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_after_wallet_change_only_touches_submitting_wallet() {
        const OTHER: &str = "0xdef0000000000000000000000000000000000002";
        let node = FakeNode::healthy()
            .decimals(6)
            .balances(vec![Ok(U256::from(150_250_000u64))])
            .receipts(vec![Ok(Some(receipt(1)))]);
        let f = fixture(cooperative_wallet(), node).await;
        f.store
            .save_portfolio(OTHER, &CachedPortfolio::new(vec![sample_token("USDC", "eth", 500.0, 6, 1.0)]))
            .await
            .unwrap();

        f.service.select_token(&f.usdc.identity()).await.unwrap();
        let accepted = f
            .service
            .accept_submission(SwapSubmission { tx_hash: TX.to_string(), metadata: serde_json::Value::Null })
            .await
            .unwrap();
        f.portfolio.connect(OTHER).await.unwrap();

        let outcome = f.service.complete_submission(accepted).await;

        assert!(matches!(outcome, MonitorOutcome::Confirmed { .. }));
        let state = f.portfolio.state();
        let state = state.read().await;
        assert_eq!(state.wallet.as_deref(), Some(OTHER));
        assert_eq!(state.tokens[0].amount, 500.0);
        assert_eq!(f.store.load_portfolio(OTHER).await.unwrap().unwrap().tokens[0].amount, 500.0);
        assert_eq!(f.store.load_portfolio(WALLET).await.unwrap().unwrap().tokens[0].amount, 150.25);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_cache_write_is_reported_instead_of_success() {
        let storage = Arc::new(LockableStorage::default());
        let node = FakeNode::healthy()
            .decimals(6)
            .balances(vec![Ok(U256::from(150_250_000u64))])
            .receipts(vec![Ok(Some(receipt(1)))]);
        let f = fixture_on(storage.clone(), cooperative_wallet(), node).await;
        f.service.select_token(&f.usdc.identity()).await.unwrap();
        storage.read_only.store(true, AtomicOrdering::SeqCst);

        f.service
            .track_submission(SwapSubmission { tx_hash: TX.to_string(), metadata: serde_json::Value::Null })
            .await
            .unwrap();

        let notices = f.notices.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NotificationKind::Error);
        assert!(notices[0].message.contains("150.25"));
        assert!(notices[0].message.contains("disk full"));
        assert_eq!(f.store.load_portfolio(WALLET).await.unwrap().unwrap().tokens[0].amount, 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_swap_notifies_without_reconciling() {
        let f = fixture(cooperative_wallet(), FakeNode::healthy()).await;
        f.service.select_token(&f.usdc.identity()).await.unwrap();

        let outcome = f
            .service
            .track_submission(SwapSubmission { tx_hash: TX.to_string(), metadata: serde_json::Value::Null })
            .await
            .unwrap();

        assert_eq!(outcome, MonitorOutcome::TimedOut { attempts: 60 });
        let notices = f.notices.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NotificationKind::Error);
        assert!(notices[0].message.contains("not confirmed after 60 attempts"));
        assert_eq!(FakeNode::count(&f.connector.get("https://eth-node").balance_calls), 0);
        assert_eq!(f.portfolio.state().read().await.tokens[0].amount, 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submission_rejected_while_monitoring() {
        let f = fixture(cooperative_wallet(), FakeNode::healthy()).await;
        f.service.select_token(&f.usdc.identity()).await.unwrap();

        let accepted = f
            .service
            .accept_submission(SwapSubmission { tx_hash: TX.to_string(), metadata: serde_json::Value::Null })
            .await
            .unwrap();
        assert_eq!(accepted.transaction().chain_id, 1);

        let second = f
            .service
            .accept_submission(SwapSubmission { tx_hash: TX.to_string(), metadata: serde_json::Value::Null })
            .await;
        assert!(matches!(second, Err(LiquidatorError::Validation(_))));
        assert!(f.service.status().await.unwrap().monitoring);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closing_session_abandons_monitor() {
        let f = fixture(cooperative_wallet(), FakeNode::healthy()).await;
        f.service.select_token(&f.usdc.identity()).await.unwrap();
        let accepted = f
            .service
            .accept_submission(SwapSubmission { tx_hash: TX.to_string(), metadata: serde_json::Value::Null })
            .await
            .unwrap();

        let service = f.service.clone();
        let handle = tokio::spawn(async move { service.complete_submission(accepted).await });
        tokio::time::sleep(Duration::from_secs(7)).await;
        f.service.close_session().await;

        let outcome = handle.await.unwrap();
        assert!(matches!(outcome, MonitorOutcome::Abandoned { .. }));
        assert!(f.notices.is_empty());
        assert!(f.service.status().await.is_none());
    }

    #[tokio::test]
    async fn test_refused_switch_still_opens_session() {
        let mut wallet = MockWalletProvider::new();
        wallet
            .expect_switch_chain()
            .returning(|_| Err(LiquidatorError::provider_request("Unrecognized chain ID")));
        let f = fixture(wallet, FakeNode::healthy()).await;

        let request = f.service.select_token(&f.usdc.identity()).await.unwrap();

        assert!(request.ready);
        assert!(f.service.status().await.is_some());
    }

    #[tokio::test]
    async fn test_select_uses_stored_destination_preference() {
        let f = fixture(cooperative_wallet(), FakeNode::healthy()).await;
        f.service
            .set_destination_token("eth", "0xdac17f958d2ee523a2206206994597c13d831ec7")
            .await
            .unwrap();

        let request = f.service.select_token(&f.usdc.identity()).await.unwrap();
        assert_eq!(request.token_out.as_deref(), Some("0xdac17f958d2ee523a2206206994597c13d831ec7"));

        assert!(f.service.set_destination_token("eth", "nope").await.is_err());
        assert!(matches!(
            f.service.set_destination_token("unknownchain", "0xdac17f958d2ee523a2206206994597c13d831ec7").await,
            Err(LiquidatorError::UnsupportedChain(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_chain_and_missing_session() {
        let f = fixture(cooperative_wallet(), FakeNode::healthy()).await;
        let odd = sample_token("ODD", "unknownchain", 5.0, 18, 1.0);
        f.portfolio.state().write().await.tokens.push(odd.clone());

        assert!(matches!(
            f.service.select_token(&odd.identity()).await,
            Err(LiquidatorError::UnsupportedChain(_))
        ));
        assert!(matches!(
            f.service
                .track_submission(SwapSubmission { tx_hash: TX.to_string(), metadata: serde_json::Value::Null })
                .await,
            Err(LiquidatorError::Validation(_))
        ));
    }
}
