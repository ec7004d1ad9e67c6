//! Token entities for the liquidator core

use crate::shared::constants::{DestTokenSpec, DEST_TOKEN_SPECS};
use crate::shared::error::LiquidatorError;
use crate::shared::utils::{format_units, parse_hex_quantity, to_hex_quantity, u256_to_f64};
use ethers::types::U256;
use serde::{Deserialize, Serialize};

/// A held token as reported by the portfolio API.
///
/// `amount`, `raw_amount` and `raw_amount_hex_str` describe the same balance:
/// `amount == raw_amount / 10^decimals` and the hex string is the canonical
/// encoding of the raw integer. [`TokenBalance::apply_raw_balance`] keeps them
/// in step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenBalance {
    pub id: String,
    pub chain: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub display_symbol: Option<String>,
    #[serde(default)]
    pub optimized_symbol: Option<String>,
    pub decimals: u8,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub protocol_id: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub price_24h_change: Option<f64>,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub is_core: Option<bool>,
    #[serde(default)]
    pub is_wallet: Option<bool>,
    #[serde(default)]
    pub time_at: Option<f64>,
    pub amount: f64,
    #[serde(default)]
    pub raw_amount: f64,
    #[serde(default)]
    pub raw_amount_hex_str: Option<String>,
}

/// Identity of a held token: contract id plus chain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TokenIdentity {
    pub id: String,
    pub chain: String,
}

impl TokenIdentity {
    pub fn new(id: impl Into<String>, chain: impl Into<String>) -> Self {
        Self { id: id.into(), chain: chain.into() }
    }

    pub fn matches(&self, token: &TokenBalance) -> bool {
        token.id.eq_ignore_ascii_case(&self.id) && token.chain == self.chain
    }
}

impl TokenBalance {
    pub fn identity(&self) -> TokenIdentity {
        TokenIdentity::new(self.id.clone(), self.chain.clone())
    }

    /// Symbol to show, preferring the API's display variants
    pub fn label(&self) -> &str {
        self.display_symbol
            .as_deref()
            .or(self.optimized_symbol.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.symbol)
    }

    /// Raw balance as a big integer
    pub fn raw_amount_u256(&self) -> Result<U256, LiquidatorError> {
        match &self.raw_amount_hex_str {
            Some(hex) => parse_hex_quantity(hex),
            None => U256::from_dec_str(&format!("{:.0}", self.raw_amount)).map_err(|e| {
                LiquidatorError::validation(format!("Invalid raw amount for {}: {:?}", self.symbol, e))
            }),
        }
    }

    /// Full balance as a canonical decimal string, suitable as a swap input amount.
    pub fn full_balance(&self) -> Result<String, LiquidatorError> {
        Ok(format_units(self.raw_amount_u256()?, self.decimals))
    }

    pub fn value_usd(&self) -> f64 {
        self.price * self.amount
    }

    pub fn is_core(&self) -> bool {
        self.is_core.unwrap_or(false)
    }

    /// Replace the balance with a freshly read raw amount.
    pub fn apply_raw_balance(&mut self, raw: U256, decimals: u8) {
        let formatted = format_units(raw, decimals);
        self.decimals = decimals;
        self.raw_amount = u256_to_f64(raw);
        self.raw_amount_hex_str = Some(to_hex_quantity(raw));
        self.amount = formatted.parse::<f64>().unwrap_or(self.raw_amount / 10f64.powi(decimals as i32));
    }

    /// Whether the three balance fields agree with each other
    pub fn is_consistent(&self) -> bool {
        let scaled = self.raw_amount / 10f64.powi(self.decimals as i32);
        if !approx_eq(self.amount, scaled) {
            return false;
        }
        match &self.raw_amount_hex_str {
            Some(hex) => parse_hex_quantity(hex)
                .map(|raw| approx_eq(u256_to_f64(raw), self.raw_amount))
                .unwrap_or(false),
            None => true,
        }
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= f64::EPSILON.max(a.abs().max(b.abs()) * 1e-9)
}

/// A swap destination candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub chain: String,
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub logo_url: Option<String>,
    pub decimals: u8,
}

impl From<&DestTokenSpec> for Token {
    fn from(spec: &DestTokenSpec) -> Self {
        Self {
            chain: spec.chain.to_string(),
            address: spec.address.to_string(),
            name: spec.name.to_string(),
            symbol: spec.symbol.to_string(),
            logo_url: Some(spec.logo.to_string()),
            decimals: spec.decimals,
        }
    }
}

/// Destination candidates offered by the swap widget on `chain`
pub fn destination_tokens(chain: &str) -> Vec<Token> {
    DEST_TOKEN_SPECS
        .iter()
        .filter(|spec| spec.chain == chain)
        .map(Token::from)
        .collect()
}

/// A consistent token record for tests
#[cfg(any(test, feature = "test-support"))]
pub fn sample_token(symbol: &str, chain: &str, amount: f64, decimals: u8, price: f64) -> TokenBalance {
    let raw = crate::shared::utils::parse_units(&format!("{}", amount), decimals)
        .unwrap_or_default();
    let mut token = TokenBalance {
        id: format!("0x{:0>40}", symbol.to_lowercase().bytes().map(|b| format!("{:x}", b)).collect::<String>()),
        chain: chain.to_string(),
        name: symbol.to_string(),
        symbol: symbol.to_string(),
        display_symbol: None,
        optimized_symbol: Some(symbol.to_string()),
        decimals,
        logo_url: None,
        protocol_id: String::new(),
        price,
        price_24h_change: Some(0.0),
        is_verified: Some(true),
        is_core: Some(true),
        is_wallet: Some(true),
        time_at: None,
        amount: 0.0,
        raw_amount: 0.0,
        raw_amount_hex_str: None,
    };
    token.apply_raw_balance(raw, decimals);
    token
}
