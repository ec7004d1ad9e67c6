//! Balance reader
//!
//! Reads a holder's token balance and precision straight from the chain,
//! through whichever endpoint the prober finds alive.

use crate::application::ports::ChainNode;
use crate::core::endpoints::EndpointProber;
use crate::shared::constants::{CALL_TIMEOUT, NATIVE_TOKEN_DECIMALS, NETWORK_RETRY_DELAY};
use crate::shared::error::LiquidatorError;
use crate::shared::utils::{format_units, parse_address};
use ethers::types::{Address, U256};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// What is being read: an ERC-20 contract or the chain's native coin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceSource {
    Erc20(Address),
    Native,
}

impl BalanceSource {
    /// Portfolio token ids are contract addresses, except for native coins
    /// which use a bare chain symbol such as `eth` or `matic`.
    pub fn from_token_id(token_id: &str) -> Result<Self, LiquidatorError> {
        if token_id.starts_with("0x") {
            Ok(Self::Erc20(parse_address(token_id)?))
        } else {
            Ok(Self::Native)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnChainBalance {
    pub raw: U256,
    pub decimals: u8,
    /// Canonical decimal rendering of `raw`
    pub formatted: String,
    pub endpoint: String,
}

pub struct BalanceReader {
    prober: Arc<EndpointProber>,
    call_timeout: Duration,
    retry_delay: Duration,
}

impl BalanceReader {
    pub fn new(prober: Arc<EndpointProber>) -> Self {
        Self {
            prober,
            call_timeout: CALL_TIMEOUT,
            retry_delay: NETWORK_RETRY_DELAY,
        }
    }

    pub fn with_timeouts(mut self, call_timeout: Duration, retry_delay: Duration) -> Self {
        self.call_timeout = call_timeout;
        self.retry_delay = retry_delay;
        self
    }

    /// Current balance of `token_id` held by `owner` on `chain_id`.
    ///
    /// A read that fails because the provider could not reach its network is
    /// retried once after the retry delay; every other failure surfaces.
    pub async fn read_balance(
        &self,
        token_id: &str,
        owner: &str,
        chain_id: u64,
    ) -> Result<OnChainBalance, LiquidatorError> {
        let source = BalanceSource::from_token_id(token_id)?;
        let owner = parse_address(owner)?;

        match self.read_once(source, owner, chain_id).await {
            Err(e) if e.is_network_undetectable() => {
                log::warn!(
                    "Balance read for {} on chain {} could not reach the network, retrying in {}ms: {}",
                    token_id,
                    chain_id,
                    self.retry_delay.as_millis(),
                    e
                );
                sleep(self.retry_delay).await;
                self.read_once(source, owner, chain_id).await
            }
            result => result,
        }
    }

    async fn read_once(
        &self,
        source: BalanceSource,
        owner: Address,
        chain_id: u64,
    ) -> Result<OnChainBalance, LiquidatorError> {
        let endpoint = self.prober.probe(chain_id).await?;
        let node: &dyn ChainNode = endpoint.node.as_ref();

        let (raw, decimals) = match source {
            BalanceSource::Erc20(token) => {
                tokio::try_join!(
                    self.timed("balanceOf", node.erc20_balance(token, owner)),
                    self.timed("decimals", node.erc20_decimals(token)),
                )?
            }
            BalanceSource::Native => {
                let raw = self.timed("eth_getBalance", node.native_balance(owner)).await?;
                (raw, NATIVE_TOKEN_DECIMALS)
            }
        };

        Ok(OnChainBalance {
            raw,
            decimals,
            formatted: format_units(raw, decimals),
            endpoint: endpoint.url,
        })
    }

    async fn timed<T>(
        &self,
        call: &str,
        request: impl Future<Output = Result<T, LiquidatorError>>,
    ) -> Result<T, LiquidatorError> {
        timeout(self.call_timeout, request)
            .await
            .map_err(|_| LiquidatorError::rpc_timeout(call, self.call_timeout))?
    }
}
