//! JSON-RPC adapters built on ethers
//!
//! [`EthersConnector`] opens node connections for the endpoint prober and
//! [`JsonRpcWallet`] talks to the user's wallet over its RPC interface.

use crate::application::ports::{ChainNode, NodeConnector, WalletProvider};
use crate::domain::entities::ReceiptInfo;
use crate::shared::error::LiquidatorError;
use crate::shared::utils::chain_id_to_hex;
use async_trait::async_trait;
use ethers::abi::{parse_abi, Abi};
use ethers::contract::Contract;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, H256, U256};
use ethers::utils::to_checksum;
use serde_json::json;
use std::sync::Arc;

const ERC20_ABI: &[&str] = &[
    "function balanceOf(address owner) view returns (uint256)",
    "function decimals() view returns (uint8)",
];

fn node_error(call: &str, e: impl std::fmt::Display) -> LiquidatorError {
    LiquidatorError::contract_call(format!("{} failed: {}", call, e))
}

/// Opens an HTTP provider per endpoint URL, sharing one parsed ERC-20 ABI
pub struct EthersConnector {
    erc20: Abi,
}

impl EthersConnector {
    pub fn new() -> Result<Self, LiquidatorError> {
        let erc20 = parse_abi(ERC20_ABI)
            .map_err(|e| LiquidatorError::internal(format!("Invalid ERC-20 ABI: {}", e)))?;
        Ok(Self { erc20 })
    }
}

impl NodeConnector for EthersConnector {
    fn connect(&self, chain_id: u64, url: &str) -> Result<Arc<dyn ChainNode>, LiquidatorError> {
        let provider = Provider::<Http>::try_from(url).map_err(|e| {
            LiquidatorError::config(format!("Invalid RPC URL {} for chain {}: {}", url, chain_id, e))
        })?;
        Ok(Arc::new(EthersNode {
            provider: Arc::new(provider),
            erc20: self.erc20.clone(),
        }))
    }
}

pub struct EthersNode {
    provider: Arc<Provider<Http>>,
    erc20: Abi,
}

impl EthersNode {
    fn erc20(&self, token: Address) -> Contract<Provider<Http>> {
        Contract::new(token, self.erc20.clone(), self.provider.clone())
    }
}

#[async_trait]
impl ChainNode for EthersNode {
    async fn block_number(&self) -> Result<u64, LiquidatorError> {
        let block = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| node_error("eth_blockNumber", e))?;
        Ok(block.as_u64())
    }

    async fn erc20_balance(&self, token: Address, owner: Address) -> Result<U256, LiquidatorError> {
        self.erc20(token)
            .method::<_, U256>("balanceOf", owner)
            .map_err(|e| node_error("balanceOf", e))?
            .call()
            .await
            .map_err(|e| node_error("balanceOf", e))
    }

    async fn erc20_decimals(&self, token: Address) -> Result<u8, LiquidatorError> {
        self.erc20(token)
            .method::<_, u8>("decimals", ())
            .map_err(|e| node_error("decimals", e))?
            .call()
            .await
            .map_err(|e| node_error("decimals", e))
    }

    async fn native_balance(&self, owner: Address) -> Result<U256, LiquidatorError> {
        self.provider
            .get_balance(owner, None)
            .await
            .map_err(|e| node_error("eth_getBalance", e))
    }

    async fn transaction_receipt(&self, tx_hash: H256) -> Result<Option<ReceiptInfo>, LiquidatorError> {
        let receipt = match self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| node_error("eth_getTransactionReceipt", e))?
        {
            Some(receipt) => receipt,
            None => return Ok(None),
        };

        let block_number = receipt.block_number.map(|block| block.as_u64());
        let confirmations = match block_number {
            Some(mined_in) => {
                let latest = self.block_number().await?;
                latest.saturating_sub(mined_in) + 1
            }
            None => 0,
        };

        Ok(Some(ReceiptInfo {
            tx_hash: receipt.transaction_hash,
            block_number,
            status: receipt.status.map(|status| status.as_u64()),
            confirmations,
        }))
    }
}

/// The user's wallet, reached through its JSON-RPC endpoint
pub struct JsonRpcWallet {
    provider: Provider<Http>,
}

impl JsonRpcWallet {
    pub fn new(url: &str) -> Result<Self, LiquidatorError> {
        let provider = Provider::<Http>::try_from(url)
            .map_err(|e| LiquidatorError::config(format!("Invalid wallet RPC URL {}: {}", url, e)))?;
        Ok(Self { provider })
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, LiquidatorError> {
        let accounts: Vec<Address> = self
            .provider
            .request("eth_requestAccounts", ())
            .await
            .map_err(|e| LiquidatorError::provider_request(e.to_string()))?;
        Ok(accounts.iter().map(|account| to_checksum(account, None)).collect())
    }

    async fn list_accounts(&self) -> Result<Vec<String>, LiquidatorError> {
        let accounts = self
            .provider
            .get_accounts()
            .await
            .map_err(|e| LiquidatorError::provider_request(e.to_string()))?;
        Ok(accounts.iter().map(|account| to_checksum(account, None)).collect())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), LiquidatorError> {
        let params = [json!({ "chainId": chain_id_to_hex(chain_id) })];
        let _: serde_json::Value = self
            .provider
            .request("wallet_switchEthereumChain", params)
            .await
            .map_err(|e| LiquidatorError::provider_request(e.to_string()))?;
        Ok(())
    }

    async fn chain_id(&self) -> Result<u64, LiquidatorError> {
        let chain_id = self
            .provider
            .get_chainid()
            .await
            .map_err(|e| LiquidatorError::provider_request(e.to_string()))?;
        Ok(chain_id.as_u64())
    }
}
