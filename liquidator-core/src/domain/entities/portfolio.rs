//! Cached portfolio entity

use super::token::{TokenBalance, TokenIdentity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-wallet portfolio snapshot, persisted as one blob under the
/// lowercase wallet address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedPortfolio {
    pub tokens: Vec<TokenBalance>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

impl CachedPortfolio {
    pub fn new(tokens: Vec<TokenBalance>) -> Self {
        Self { tokens, last_updated: Utc::now() }
    }

    pub fn find_mut(&mut self, identity: &TokenIdentity) -> Option<&mut TokenBalance> {
        self.tokens.iter_mut().find(|token| identity.matches(token))
    }
}
