//! DeBank Pro OpenAPI client

use crate::application::ports::PortfolioSource;
use crate::domain::entities::TokenBalance;
use crate::shared::constants::{
    DEFAULT_PORTFOLIO_API_URL, PORTFOLIO_ACCESS_KEY_HEADER, PORTFOLIO_REQUEST_TIMEOUT, PORTFOLIO_TOKEN_LIST_PATH,
};
use crate::shared::error::LiquidatorError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

pub struct DebankClient {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for DebankClient {
    fn default() -> Self {
        Self::new(DEFAULT_PORTFOLIO_API_URL)
    }
}

impl DebankClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: PORTFOLIO_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn token_list_url(&self) -> String {
        format!("{}{}", self.base_url, PORTFOLIO_TOKEN_LIST_PATH)
    }
}

/// Turn a token list response into tokens or a portfolio error.
///
/// Failed responses report the body's `message` field when there is one.
fn interpret(status: StatusCode, body: &str) -> Result<Vec<TokenBalance>, LiquidatorError> {
    if !status.is_success() {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
        return Err(LiquidatorError::portfolio_api(message));
    }

    serde_json::from_str(body)
        .map_err(|e| LiquidatorError::portfolio_api(format!("Unexpected token list response: {}", e)))
}

#[async_trait]
impl PortfolioSource for DebankClient {
    async fn fetch_tokens(&self, wallet: &str, access_key: &str) -> Result<Vec<TokenBalance>, LiquidatorError> {
        log::debug!("Fetching token list for {}", wallet);
        let response = self
            .http_client
            .get(self.token_list_url())
            .query(&[("id", wallet)])
            .header(PORTFOLIO_ACCESS_KEY_HEADER, access_key)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LiquidatorError::portfolio_api(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LiquidatorError::portfolio_api(e.to_string()))?;

        let result = interpret(status, &body);
        match &result {
            Ok(tokens) => log::debug!("Token list for {} has {} entries", wallet, tokens.len()),
            Err(e) => log::error!("Token list request for {} failed ({}): {}", wallet, status, e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body_parses_tokens() {
        let body = r#"[{
            "id": "eth", "chain": "eth", "name": "ETH", "symbol": "ETH",
            "decimals": 18, "price": 3000.0, "amount": 0.5,
            "raw_amount": 500000000000000000, "raw_amount_hex_str": "0x6f05b59d3b20000",
            "is_core": true
        }]"#;
        let tokens = interpret(StatusCode::OK, body).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value_usd(), 1500.0);
        assert!(tokens[0].is_consistent());
    }

    #[test]
    fn test_error_body_message_is_verbatim() {
        let body = r#"{"message": "Invalid AccessKey", "code": 401}"#;
        assert_eq!(
            interpret(StatusCode::UNAUTHORIZED, body).unwrap_err(),
            LiquidatorError::portfolio_api("Invalid AccessKey")
        );
    }

    #[test]
    fn test_error_without_message_reports_status() {
        let err = interpret(StatusCode::TOO_MANY_REQUESTS, "<html>slow down</html>").unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status code 429");
    }

    #[test]
    fn test_token_list_url() {
        assert_eq!(
            DebankClient::new("https://pro-openapi.debank.com/").token_list_url(),
            "https://pro-openapi.debank.com/v1/user/all_token_list"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_portfolio_error() {
        let client = DebankClient::new("http://127.0.0.1:1");
        let result = client.fetch_tokens("0xabc", "key").await;
        assert!(matches!(result, Err(LiquidatorError::PortfolioApi(_))));
    }
}
