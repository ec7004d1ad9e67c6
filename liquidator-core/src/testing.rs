//! Scripted fakes for the external ports.
//!
//! Used by the unit tests here and, through the `test-support` feature, by
//! the server's handler tests.

use crate::application::ports::{ChainNode, NodeConnector, PortfolioSource, WalletProvider};
use crate::domain::entities::{ReceiptInfo, TokenBalance};
use crate::shared::error::LiquidatorError;
use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Liveness {
    Healthy,
    Failing,
    Hanging,
}

pub struct FakeNode {
    pub liveness: Liveness,
    pub decimals: u8,
    pub call_delay: Duration,
    balances: Mutex<VecDeque<Result<U256, LiquidatorError>>>,
    receipts: Mutex<VecDeque<Result<Option<ReceiptInfo>, LiquidatorError>>>,
    pub block_calls: AtomicUsize,
    pub balance_calls: AtomicUsize,
    pub decimals_calls: AtomicUsize,
    pub receipt_calls: AtomicUsize,
}

impl FakeNode {
    pub fn healthy() -> Self {
        Self::with_liveness(Liveness::Healthy)
    }

    pub fn with_liveness(liveness: Liveness) -> Self {
        Self {
            liveness,
            decimals: 18,
            call_delay: Duration::ZERO,
            balances: Mutex::new(VecDeque::new()),
            receipts: Mutex::new(VecDeque::new()),
            block_calls: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
            decimals_calls: AtomicUsize::new(0),
            receipt_calls: AtomicUsize::new(0),
        }
    }

    pub fn decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = delay;
        self
    }

    /// Queue balance answers; once drained the node answers zero.
    pub fn balances(self, answers: Vec<Result<U256, LiquidatorError>>) -> Self {
        self.balances.lock().unwrap().extend(answers);
        self
    }

    /// Queue receipt answers; once drained the node answers "not mined".
    pub fn receipts(self, answers: Vec<Result<Option<ReceiptInfo>, LiquidatorError>>) -> Self {
        self.receipts.lock().unwrap().extend(answers);
        self
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainNode for FakeNode {
    async fn block_number(&self) -> Result<u64, LiquidatorError> {
        self.block_calls.fetch_add(1, Ordering::SeqCst);
        match self.liveness {
            Liveness::Healthy => Ok(1_000),
            Liveness::Failing => Err(LiquidatorError::contract_call("connection refused")),
            Liveness::Hanging => {
                tokio::time::sleep(Duration::from_secs(3_600)).await;
                Ok(1_000)
            }
        }
    }

    async fn erc20_balance(&self, _token: Address, _owner: Address) -> Result<U256, LiquidatorError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.call_delay).await;
        self.balances.lock().unwrap().pop_front().unwrap_or(Ok(U256::zero()))
    }

    async fn erc20_decimals(&self, _token: Address) -> Result<u8, LiquidatorError> {
        self.decimals_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.call_delay).await;
        Ok(self.decimals)
    }

    async fn native_balance(&self, _owner: Address) -> Result<U256, LiquidatorError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.balances.lock().unwrap().pop_front().unwrap_or(Ok(U256::zero()))
    }

    async fn transaction_receipt(&self, _tx_hash: H256) -> Result<Option<ReceiptInfo>, LiquidatorError> {
        self.receipt_calls.fetch_add(1, Ordering::SeqCst);
        self.receipts.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

/// Hands out pre-registered nodes by URL and records every connect.
#[derive(Default)]
pub struct FakeConnector {
    nodes: HashMap<String, Arc<FakeNode>>,
    pub connects: Mutex<Vec<String>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, url: &str, node: FakeNode) -> Self {
        self.nodes.insert(url.to_string(), Arc::new(node));
        self
    }

    pub fn get(&self, url: &str) -> Arc<FakeNode> {
        self.nodes[url].clone()
    }

    pub fn connects(&self) -> Vec<String> {
        self.connects.lock().unwrap().clone()
    }
}

impl NodeConnector for FakeConnector {
    fn connect(&self, _chain_id: u64, url: &str) -> Result<Arc<dyn ChainNode>, LiquidatorError> {
        self.connects.lock().unwrap().push(url.to_string());
        self.nodes
            .get(url)
            .cloned()
            .map(|node| node as Arc<dyn ChainNode>)
            .ok_or_else(|| LiquidatorError::config(format!("Invalid RPC URL {}", url)))
    }
}

#[derive(Default)]
pub struct FakePortfolioSource {
    answers: Mutex<VecDeque<Result<Vec<TokenBalance>, LiquidatorError>>>,
    pub calls: AtomicUsize,
}

impl FakePortfolioSource {
    pub fn new(answers: Vec<Result<Vec<TokenBalance>, LiquidatorError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PortfolioSource for FakePortfolioSource {
    async fn fetch_tokens(&self, _wallet: &str, _access_key: &str) -> Result<Vec<TokenBalance>, LiquidatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn endpoint_set(chain_id: u64, urls: &[&str]) -> crate::domain::entities::RpcEndpointSet {
    let mut endpoints = HashMap::new();
    endpoints.insert(chain_id, urls.iter().map(|u| u.to_string()).collect());
    crate::domain::entities::RpcEndpointSet::new(endpoints)
}

/// A wallet exposing a settable account list that records chain switches.
pub struct FakeWallet {
    accounts: Mutex<Vec<String>>,
    refuse_switch: bool,
    pub switches: Mutex<Vec<u64>>,
}

impl FakeWallet {
    pub fn new(accounts: &[&str]) -> Self {
        Self {
            accounts: Mutex::new(accounts.iter().map(|a| a.to_string()).collect()),
            refuse_switch: false,
            switches: Mutex::new(Vec::new()),
        }
    }

    pub fn refusing_switch(mut self) -> Self {
        self.refuse_switch = true;
        self
    }

    pub fn switches(&self) -> Vec<u64> {
        self.switches.lock().unwrap().clone()
    }

    /// Make `account` the one the wallet exposes from now on
    pub fn select_account(&self, account: &str) {
        *self.accounts.lock().unwrap() = vec![account.to_string()];
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, LiquidatorError> {
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn list_accounts(&self) -> Result<Vec<String>, LiquidatorError> {
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), LiquidatorError> {
        self.switches.lock().unwrap().push(chain_id);
        if self.refuse_switch {
            return Err(LiquidatorError::provider_request("User rejected the request"));
        }
        Ok(())
    }

    async fn chain_id(&self) -> Result<u64, LiquidatorError> {
        Ok(self.switches.lock().unwrap().last().copied().unwrap_or(1))
    }
}
