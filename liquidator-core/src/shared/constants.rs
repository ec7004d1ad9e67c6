//! Constants for the liquidator core
//!
//! This module contains timing policy, storage keys and the static
//! network, endpoint and destination token tables.

use std::time::Duration;

// Endpoint probing
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

// Balance reads
pub const CALL_TIMEOUT: Duration = Duration::from_secs(10);
pub const NETWORK_RETRY_DELAY: Duration = Duration::from_secs(1);
pub const NATIVE_TOKEN_DECIMALS: u8 = 18;

// Network switching
pub const SWITCH_SETTLE_DELAY: Duration = Duration::from_millis(100);

// Transaction monitoring
pub const MONITOR_INITIAL_DELAY: Duration = Duration::from_secs(5);
pub const MONITOR_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const MONITOR_MAX_ATTEMPTS: u32 = 60;
pub const RECEIPT_TIMEOUT: Duration = Duration::from_secs(10);
pub const MIN_CONFIRMATIONS: u64 = 1;

// Portfolio API
pub const DEFAULT_PORTFOLIO_API_URL: &str = "https://pro-openapi.debank.com";
pub const PORTFOLIO_TOKEN_LIST_PATH: &str = "/v1/user/all_token_list";
pub const PORTFOLIO_ACCESS_KEY_HEADER: &str = "AccessKey";
pub const PORTFOLIO_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Portfolio view defaults
pub const DEFAULT_SMALL_VALUE_THRESHOLD: f64 = 10.0;

// Wallet provider
pub const DEFAULT_WALLET_RPC_URL: &str = "http://127.0.0.1:1248";

// Storage keys
pub const API_KEY_STORAGE_KEY: &str = "debankApiKey";
pub const DEST_TOKEN_KEY_PREFIX: &str = "selectedDestToken_";
pub const DEFAULT_DATA_DIR_NAME: &str = "liquidator";

/// Static description of a supported network
pub struct NetworkSpec {
    pub chain_id: u64,
    pub chain_name: &'static str,
    pub display_name: &'static str,
    pub logo: &'static str,
    pub explorer_url: &'static str,
}

pub static NETWORK_SPECS: &[NetworkSpec] = &[
    NetworkSpec { chain_id: 1, chain_name: "eth", display_name: "Ethereum", logo: "logos/ethereum-eth-logo.png", explorer_url: "https://etherscan.io" },
    NetworkSpec { chain_id: 56, chain_name: "bsc", display_name: "Binance Smart Chain", logo: "logos/binance-coin-bnb-logo.png", explorer_url: "https://bscscan.com" },
    NetworkSpec { chain_id: 137, chain_name: "matic", display_name: "Polygon", logo: "logos/polygon-matic-logo.png", explorer_url: "https://polygonscan.com" },
    NetworkSpec { chain_id: 43114, chain_name: "avax", display_name: "Avalanche", logo: "logos/avalanche-avax-logo.png", explorer_url: "https://snowtrace.io" },
    NetworkSpec { chain_id: 250, chain_name: "ftm", display_name: "Fantom", logo: "logos/fantom-ftm-logo.png", explorer_url: "https://ftmscan.com" },
    NetworkSpec { chain_id: 42161, chain_name: "arb", display_name: "Arbitrum", logo: "logos/arbitrum-arb-logo.png", explorer_url: "https://arbiscan.io" },
    NetworkSpec { chain_id: 10, chain_name: "op", display_name: "Optimism", logo: "logos/optimism-ethereum-op-logo.png", explorer_url: "https://optimistic.etherscan.io" },
    NetworkSpec { chain_id: 100, chain_name: "xdai", display_name: "xDai", logo: "logos/xdai-stake-logo.png", explorer_url: "https://blockscout.com/xdai/mainnet" },
    NetworkSpec { chain_id: 42220, chain_name: "celo", display_name: "Celo", logo: "logos/celo-celo-logo.png", explorer_url: "https://explorer.celo.org" },
    NetworkSpec { chain_id: 128, chain_name: "heco", display_name: "Heco", logo: "logos/ethereum-eth-logo.png", explorer_url: "https://hecoinfo.com" },
    NetworkSpec { chain_id: 66, chain_name: "okexchain", display_name: "OKExChain", logo: "logos/ethereum-eth-logo.png", explorer_url: "https://www.oklink.com/okexchain" },
    NetworkSpec { chain_id: 25, chain_name: "cro", display_name: "Cronos", logo: "logos/cronos-cro-logo.png", explorer_url: "https://cronoscan.com" },
    NetworkSpec { chain_id: 1285, chain_name: "moonriver", display_name: "Moonriver", logo: "logos/moonriver-movr-logo.png", explorer_url: "https://moonriver.moonscan.io" },
    NetworkSpec { chain_id: 1284, chain_name: "moonbeam", display_name: "Moonbeam", logo: "logos/moonbeam-glmr-logo.png", explorer_url: "https://moonbeam.moonscan.io" },
    NetworkSpec { chain_id: 1313161554, chain_name: "aurora", display_name: "Aurora", logo: "logos/aurora-aurora-logo.png", explorer_url: "https://aurorascan.dev" },
    NetworkSpec { chain_id: 42262, chain_name: "oasis", display_name: "Oasis", logo: "logos/oasis-network-rose-logo.png", explorer_url: "https://explorer.oasisprotocol.org" },
    NetworkSpec { chain_id: 40, chain_name: "telos", display_name: "Telos", logo: "logos/telos-tlos-logo.png", explorer_url: "https://teloscan.io" },
    NetworkSpec { chain_id: 288, chain_name: "boba", display_name: "Boba", logo: "logos/boba-network-boba-logo.png", explorer_url: "https://blockexplorer.boba.network" },
    NetworkSpec { chain_id: 1287, chain_name: "moonbase", display_name: "Moonbase", logo: "logos/ethereum-eth-logo.png", explorer_url: "https://moonbase.moonscan.io" },
    NetworkSpec { chain_id: 1666600000, chain_name: "harmony", display_name: "Harmony", logo: "logos/harmony-one-logo.png", explorer_url: "https://explorer.harmony.one" },
    NetworkSpec { chain_id: 8453, chain_name: "base", display_name: "Base", logo: "logos/base-chain-logo.png", explorer_url: "https://basescan.org" },
    NetworkSpec { chain_id: 11297108109, chain_name: "blast", display_name: "Blast", logo: "logos/blast-blast-logo.png", explorer_url: "https://explorer.blast.com" },
    NetworkSpec { chain_id: 8217, chain_name: "klay", display_name: "Klaytn", logo: "logos/klaytn-klay-logo.png", explorer_url: "https://scope.klaytn.com" },
    NetworkSpec { chain_id: 1001, chain_name: "sonic", display_name: "Sonic", logo: "logos/sonic-logo.png", explorer_url: "https://explorer.sonic.game" },
];

/// Built-in node endpoints, in probing order
pub static DEFAULT_RPC_ENDPOINTS: &[(u64, &[&str])] = &[
    (1, &[
        "https://rpc.ankr.com/eth",
        "https://cloudflare-eth.com",
        "https://main-rpc.linkpool.io",
        "https://rpc.flashbots.net",
    ]),
    (137, &[
        "https://polygon-rpc.com",
        "https://rpc-mainnet.maticvigil.com",
        "https://rpc-mainnet.matic.network",
    ]),
    (56, &[
        "https://bsc-dataseed.binance.org",
        "https://bsc-dataseed1.defibit.io",
        "https://bsc-dataseed1.ninicoin.io",
    ]),
    (42161, &["https://arb1.arbitrum.io/rpc"]),
    (10, &["https://mainnet.optimism.io"]),
    (43114, &["https://api.avax.network/ext/bc/C/rpc"]),
    (250, &["https://rpcapi.fantom.network"]),
    (100, &["https://rpc.gnosischain.com"]),
    (42170, &["https://nova.arbitrum.io/rpc"]),
    (1285, &["https://rpc.api.moonriver.moonbeam.network"]),
    (1284, &["https://rpc.api.moonbeam.network"]),
    (42220, &["https://forno.celo.org"]),
    (1001, &["https://rpc.sonic.game", "https://rpc-mainnet.sonic.game"]),
];

/// Static description of a swap destination candidate
pub struct DestTokenSpec {
    pub chain: &'static str,
    pub address: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub logo: &'static str,
    pub decimals: u8,
}

const WETH_LOGO: &str = "logos/ethereum-eth-logo.png";
const USDC_LOGO: &str = "logos/usd-coin-usdc-logo.png";
const USDT_LOGO: &str = "logos/tether-usdt-logo.png";
const DAI_LOGO: &str = "logos/multi-collateral-dai-dai-logo.png";

pub static DEST_TOKEN_SPECS: &[DestTokenSpec] = &[
    DestTokenSpec { chain: "eth", address: "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", name: "Wrapped Ether", symbol: "WETH", logo: WETH_LOGO, decimals: 18 },
    DestTokenSpec { chain: "eth", address: "0xA0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", name: "USD Coin", symbol: "USDC", logo: USDC_LOGO, decimals: 6 },
    DestTokenSpec { chain: "eth", address: "0xdac17f958d2ee523a2206206994597c13d831ec7", name: "Tether", symbol: "USDT", logo: USDT_LOGO, decimals: 6 },
    DestTokenSpec { chain: "eth", address: "0x6b175474e89094c44da98b954eedeac495271d0f", name: "Dai", symbol: "DAI", logo: DAI_LOGO, decimals: 18 },
    DestTokenSpec { chain: "matic", address: "0x7d1afa7b718fb893db30a3abc0cfc608aacfebb0", name: "Wrapped Matic", symbol: "WMATIC", logo: "logos/polygon-matic-logo.png", decimals: 18 },
    DestTokenSpec { chain: "matic", address: "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174", name: "USD Coin", symbol: "USDC", logo: USDC_LOGO, decimals: 6 },
    DestTokenSpec { chain: "matic", address: "0x3813e82e6f7098b9583FC0F33a962D02018B6803", name: "Tether", symbol: "USDT", logo: USDT_LOGO, decimals: 6 },
    DestTokenSpec { chain: "matic", address: "0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063", name: "Dai", symbol: "DAI", logo: DAI_LOGO, decimals: 18 },
    DestTokenSpec { chain: "bsc", address: "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c", name: "Wrapped BNB", symbol: "WBNB", logo: "logos/binance-coin-bnb-logo.png", decimals: 18 },
    DestTokenSpec { chain: "bsc", address: "0x8ac76a51cc950d9822d68b83fe1ad97b32cd580d", name: "USD Coin", symbol: "USDC", logo: USDC_LOGO, decimals: 18 },
    DestTokenSpec { chain: "bsc", address: "0x55d398326f99059ff775485246999027b3197955", name: "Tether", symbol: "USDT", logo: USDT_LOGO, decimals: 18 },
    DestTokenSpec { chain: "bsc", address: "0x1AF3F329e8BE154074D8769D1FFa4eE058B1DBc3", name: "Dai", symbol: "DAI", logo: DAI_LOGO, decimals: 18 },
    DestTokenSpec { chain: "avax", address: "0xB31f66AA3C1e785363F0875A1B74E27b85FD66c7", name: "Wrapped AVAX", symbol: "WAVAX", logo: "logos/avalanche-avax-logo.png", decimals: 18 },
    DestTokenSpec { chain: "avax", address: "0xB97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E", name: "USD Coin", symbol: "USDC", logo: USDC_LOGO, decimals: 6 },
    DestTokenSpec { chain: "avax", address: "0xc7198437980c041c805A1EDcbA50c1Ce5db95118", name: "Tether", symbol: "USDT", logo: USDT_LOGO, decimals: 6 },
    DestTokenSpec { chain: "avax", address: "0xd586E7F844cEa2F87f50152665BCbc2C279D8d70", name: "Dai", symbol: "DAI", logo: DAI_LOGO, decimals: 18 },
    DestTokenSpec { chain: "ftm", address: "0x21be370d5312f44cb42ce377bc9b8a0cef1a4c83", name: "Wrapped Fantom", symbol: "WFTM", logo: "logos/fantom-ftm-logo.png", decimals: 18 },
    DestTokenSpec { chain: "ftm", address: "0x04068DA6C83AFCFA0e13ba15A6696662335D5B75", name: "USD Coin", symbol: "USDC", logo: USDC_LOGO, decimals: 6 },
    DestTokenSpec { chain: "ftm", address: "0x049d68029688eAbF473097a2fC38ef61633A3C7A", name: "Tether", symbol: "USDT", logo: USDT_LOGO, decimals: 6 },
    DestTokenSpec { chain: "ftm", address: "0x8D11eC38a3EB5E956B052f67Da8Bdc9bef8Abf3E", name: "Dai", symbol: "DAI", logo: DAI_LOGO, decimals: 18 },
    DestTokenSpec { chain: "base", address: "0x4200000000000000000000000000000000000006", name: "Wrapped ETH", symbol: "WETH", logo: WETH_LOGO, decimals: 18 },
    DestTokenSpec { chain: "base", address: "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913", name: "USD Coin", symbol: "USDC", logo: USDC_LOGO, decimals: 6 },
    DestTokenSpec { chain: "arb", address: "0x82af49447d8a07e3bd95bd0d56f35241523fbab1", name: "Wrapped ETH", symbol: "WETH", logo: WETH_LOGO, decimals: 18 },
    DestTokenSpec { chain: "arb", address: "0xff970a61a04b1ca14834a43f5de4533ebddb5cc8", name: "USD Coin", symbol: "USDC", logo: USDC_LOGO, decimals: 6 },
    DestTokenSpec { chain: "arb", address: "0xfd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9", name: "Tether", symbol: "USDT", logo: USDT_LOGO, decimals: 6 },
    DestTokenSpec { chain: "arb", address: "0xda10009cbd5d07dd0cecc66161fc93d7c9000da1", name: "Dai", symbol: "DAI", logo: DAI_LOGO, decimals: 18 },
    DestTokenSpec { chain: "op", address: "0x4200000000000000000000000000000000000006", name: "Wrapped ETH", symbol: "WETH", logo: WETH_LOGO, decimals: 18 },
    DestTokenSpec { chain: "op", address: "0x7f5c764cbc14f9669b88837ca1490cca17c31607", name: "USD Coin", symbol: "USDC", logo: USDC_LOGO, decimals: 6 },
    DestTokenSpec { chain: "op", address: "0x4200000000000000000000000000000000000042", name: "Tether", symbol: "USDT", logo: USDT_LOGO, decimals: 6 },
    DestTokenSpec { chain: "op", address: "0xda10009cbd5d07dd0cecc66161fc93d7c9000da1", name: "Dai", symbol: "DAI", logo: DAI_LOGO, decimals: 18 },
    DestTokenSpec { chain: "sonic", address: "0x4200000000000000000000000000000000000006", name: "Wrapped ETH", symbol: "WETH", logo: WETH_LOGO, decimals: 18 },
    DestTokenSpec { chain: "sonic", address: "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913", name: "USD Coin", symbol: "USDC", logo: USDC_LOGO, decimals: 6 },
    DestTokenSpec { chain: "sonic", address: "0xfd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9", name: "Tether", symbol: "USDT", logo: USDT_LOGO, decimals: 6 },
    DestTokenSpec { chain: "sonic", address: "0xda10009cbd5d07dd0cecc66161fc93d7c9000da1", name: "Dai", symbol: "DAI", logo: DAI_LOGO, decimals: 18 },
];

/// Storage key of the cached portfolio blob for a wallet
pub fn portfolio_storage_key(wallet: &str) -> String {
    wallet.to_lowercase()
}

/// Storage key of the preferred destination token on a chain
pub fn dest_token_storage_key(chain: &str) -> String {
    format!("{}{}", DEST_TOKEN_KEY_PREFIX, chain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys() {
        assert_eq!(portfolio_storage_key("0xABCdef"), "0xabcdef");
        assert_eq!(dest_token_storage_key("matic"), "selectedDestToken_matic");
    }

    #[test]
    fn test_network_table_has_unique_ids() {
        let mut ids: Vec<u64> = NETWORK_SPECS.iter().map(|n| n.chain_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), NETWORK_SPECS.len());
    }

    #[test]
    fn test_monitor_budget() {
        assert_eq!(MONITOR_MAX_ATTEMPTS, 60);
        assert_eq!(MONITOR_POLL_INTERVAL, Duration::from_secs(5));
    }
}
