//! Utility functions for the liquidator core
//!
//! Amount conversions, address handling and display formatting shared by
//! the portfolio and liquidation flows.

use crate::shared::error::LiquidatorError;
use chrono::{DateTime, Utc};
use ethers::types::{Address, H256, U256};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in seconds
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0))
        .as_secs()
}

/// Validate Ethereum address format
pub fn validate_ethereum_address(address: &str) -> Result<(), LiquidatorError> {
    if !address.starts_with("0x") {
        return Err(LiquidatorError::validation("Address must start with 0x"));
    }

    if address.len() != 42 {
        return Err(LiquidatorError::validation("Address must be 42 characters long"));
    }

    if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(LiquidatorError::validation("Address contains invalid hex characters"));
    }

    Ok(())
}

/// Parse a validated address
pub fn parse_address(address: &str) -> Result<Address, LiquidatorError> {
    validate_ethereum_address(address)?;
    Address::from_str(address)
        .map_err(|e| LiquidatorError::validation(format!("Invalid address {}: {}", address, e)))
}

/// Parse a 32-byte transaction hash
pub fn parse_tx_hash(hash: &str) -> Result<H256, LiquidatorError> {
    let digits = hash
        .strip_prefix("0x")
        .ok_or_else(|| LiquidatorError::validation("Transaction hash must start with 0x"))?;
    let bytes = hex::decode(digits)?;
    if bytes.len() != 32 {
        return Err(LiquidatorError::validation(format!("Invalid transaction hash: {}", hash)));
    }
    Ok(H256::from_slice(&bytes))
}

/// Canonical big-integer hex: `0x` prefix, lowercase, no leading zeros.
pub fn to_hex_quantity(value: U256) -> String {
    format!("0x{:x}", value)
}

/// Parse a `0x`-prefixed big-integer hex string
pub fn parse_hex_quantity(value: &str) -> Result<U256, LiquidatorError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| LiquidatorError::validation(format!("Hex quantity must start with 0x: {}", value)))?;
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| LiquidatorError::validation(format!("Invalid hex quantity {}: {:?}", value, e)))
}

/// Chain id in the form wallet providers expect for `wallet_switchEthereumChain`
pub fn chain_id_to_hex(chain_id: u64) -> String {
    format!("0x{:x}", chain_id)
}

/// Format a raw integer amount with `decimals` places.
///
/// Trailing zeros are trimmed but one fractional digit is always kept,
/// so `1000000` at 6 decimals is `"1.0"`.
pub fn format_units(raw: U256, decimals: u8) -> String {
    let digits = raw.to_string();
    let decimals = decimals as usize;

    let (whole, fraction) = if digits.len() <= decimals {
        ("0".to_string(), format!("{}{}", "0".repeat(decimals - digits.len()), digits))
    } else {
        let split = digits.len() - decimals;
        (digits[..split].to_string(), digits[split..].to_string())
    };

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{}.0", whole)
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Parse a decimal amount string into its raw integer at `decimals` places
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, LiquidatorError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(LiquidatorError::validation("Amount cannot be empty"));
    }

    let parts: Vec<&str> = amount.split('.').collect();
    let (whole, fraction) = match parts.as_slice() {
        [whole] => (*whole, ""),
        [whole, fraction] => (*whole, *fraction),
        _ => return Err(LiquidatorError::validation("Invalid amount format")),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(LiquidatorError::validation("Invalid amount format"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(LiquidatorError::validation("Amount must contain only digits"));
    }
    if fraction.len() > decimals as usize {
        return Err(LiquidatorError::validation(format!(
            "Amount has more than {} decimal places",
            decimals
        )));
    }

    let mut combined = String::with_capacity(whole.len() + decimals as usize);
    combined.push_str(if whole.is_empty() { "0" } else { whole });
    combined.push_str(fraction);
    combined.push_str(&"0".repeat(decimals as usize - fraction.len()));

    U256::from_dec_str(&combined)
        .map_err(|e| LiquidatorError::validation(format!("Amount out of range: {:?}", e)))
}

/// Lossy conversion used for the floating-point amount fields.
pub fn u256_to_f64(value: U256) -> f64 {
    value.to_string().parse::<f64>().unwrap_or(f64::MAX)
}

/// `0x1234...abcd`
pub fn short_address(address: &str) -> String {
    let chars = address.chars().count();
    if chars <= 10 {
        return address.to_string();
    }
    let head: String = address.chars().take(6).collect();
    let tail: String = address.chars().skip(chars - 4).collect();
    format!("{}...{}", head, tail)
}

/// Two fixed decimals with thousands separators
pub fn format_token_balance(balance: f64) -> String {
    let formatted = format!("{:.2}", balance.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if balance < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

pub fn format_usd(value: f64) -> String {
    format!("${}", format_token_balance(value))
}

/// Relative age of `then`, in the largest whole unit
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - then).num_seconds().max(0);
    if diff < 60 {
        format!("{} seconds ago", diff)
    } else if diff < 3600 {
        format!("{} minutes ago", diff / 60)
    } else if diff < 86400 {
        format!("{} hours ago", diff / 3600)
    } else {
        format!("{} days ago", diff / 86400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    #[test]
    fn test_validate_ethereum_address() {
        assert!(validate_ethereum_address("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6").is_ok());
        assert!(validate_ethereum_address("742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6").is_err());
        assert!(validate_ethereum_address("0x742d35Cc").is_err());
    }

    #[test]
    fn test_parse_tx_hash() {
        let hash = format!("0x{}", "ab".repeat(32));
        assert!(parse_tx_hash(&hash).is_ok());
        assert!(parse_tx_hash("0x1234").is_err());
        assert!(parse_tx_hash(&"ab".repeat(32)).is_err());
    }

    #[test]
    fn test_hex_quantity() {
        assert_eq!(to_hex_quantity(U256::zero()), "0x0");
        assert_eq!(to_hex_quantity(U256::from(150_250_000u64)), "0x8f4a210");
        assert_eq!(parse_hex_quantity("0x8f4a210").unwrap(), U256::from(150_250_000u64));
        assert_eq!(parse_hex_quantity("0x").unwrap(), U256::zero());
        assert!(parse_hex_quantity("8f4a210").is_err());
    }

    #[test]
    fn test_chain_id_to_hex() {
        assert_eq!(chain_id_to_hex(1), "0x1");
        assert_eq!(chain_id_to_hex(137), "0x89");
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::from(150_250_000u64), 6), "150.25");
        assert_eq!(format_units(U256::from(1_000_000u64), 6), "1.0");
        assert_eq!(format_units(U256::from(5u64), 6), "0.000005");
        assert_eq!(format_units(U256::zero(), 18), "0.0");
        assert_eq!(format_units(U256::from(42u64), 0), "42.0");
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("150.25", 6).unwrap(), U256::from(150_250_000u64));
        assert_eq!(parse_units("1", 18).unwrap(), U256::exp10(18));
        assert_eq!(parse_units(".5", 1).unwrap(), U256::from(5u64));
        assert!(parse_units("1.1234567", 6).is_err());
        assert!(parse_units("1.2.3", 6).is_err());
        assert!(parse_units("", 6).is_err());
        assert!(parse_units("abc", 6).is_err());
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6"),
            "0x742d...d8b6"
        );
        assert_eq!(short_address("0xabc"), "0xabc");
        assert_eq!(short_address("ethéréum-wrappé-ü"), "ethéré...pé-ü");
        assert_eq!(short_address("жетон"), "жетон");
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(format_token_balance(1234567.891), "1,234,567.89");
        assert_eq!(format_token_balance(0.004), "0.00");
        assert_eq!(format_token_balance(-12.5), "-12.50");
        assert_eq!(format_usd(999.999), "$1,000.00");
    }

    #[test]
    fn test_time_ago() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(30), now), "30 seconds ago");
        assert_eq!(time_ago(now - Duration::seconds(600), now), "10 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(time_ago(now - Duration::days(3), now), "3 days ago");
        assert_eq!(time_ago(now + Duration::seconds(5), now), "0 seconds ago");
    }

    proptest! {
        #[test]
        fn formatted_amount_matches_scaled_raw(raw in any::<u64>(), decimals in 0u8..=24) {
            let formatted: f64 = format_units(U256::from(raw), decimals).parse().unwrap();
            let expected = raw as f64 / 10f64.powi(decimals as i32);
            prop_assert!((formatted - expected).abs() <= expected.abs() * 1e-12);
        }
    }
}
