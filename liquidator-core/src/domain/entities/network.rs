//! Network entities for the liquidator core

use crate::shared::constants::{NetworkSpec, DEFAULT_RPC_ENDPOINTS, NETWORK_SPECS};
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;

/// A chain the dashboard knows how to display and switch to
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub chain_id: u64,
    pub chain_name: &'static str,
    pub display_name: &'static str,
    pub logo: &'static str,
    pub explorer_url: &'static str,
}

impl From<&'static NetworkSpec> for NetworkDescriptor {
    fn from(spec: &'static NetworkSpec) -> Self {
        Self {
            chain_id: spec.chain_id,
            chain_name: spec.chain_name,
            display_name: spec.display_name,
            logo: spec.logo,
            explorer_url: spec.explorer_url,
        }
    }
}

impl NetworkDescriptor {
    /// Explorer page of a token contract
    pub fn token_url(&self, token_id: &str) -> String {
        format!("{}/token/{}", self.explorer_url, token_id)
    }

    /// Explorer page of a token filtered to one holder
    pub fn token_holder_url(&self, token_id: &str, wallet: &str) -> String {
        format!("{}/token/{}?a={}", self.explorer_url, token_id, wallet)
    }

    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }
}

lazy_static! {
    static ref NETWORKS_BY_ID: HashMap<u64, NetworkDescriptor> = NETWORK_SPECS
        .iter()
        .map(|spec| (spec.chain_id, NetworkDescriptor::from(spec)))
        .collect();
    static ref NETWORKS_BY_NAME: HashMap<&'static str, NetworkDescriptor> = NETWORK_SPECS
        .iter()
        .map(|spec| (spec.chain_name, NetworkDescriptor::from(spec)))
        .collect();
}

/// Read-only lookup over the supported networks
pub struct NetworkRegistry;

impl NetworkRegistry {
    pub fn by_id(chain_id: u64) -> Option<NetworkDescriptor> {
        NETWORKS_BY_ID.get(&chain_id).copied()
    }

    pub fn by_name(chain_name: &str) -> Option<NetworkDescriptor> {
        NETWORKS_BY_NAME.get(chain_name).copied()
    }

    /// All networks, in display order
    pub fn all() -> Vec<NetworkDescriptor> {
        NETWORK_SPECS.iter().map(NetworkDescriptor::from).collect()
    }

    pub fn is_supported(chain_name: &str) -> bool {
        NETWORKS_BY_NAME.contains_key(chain_name)
    }
}

/// Ordered candidate node URLs per chain id.
///
/// Built once from the defaults plus configuration overrides; an override
/// replaces the whole list for its chain.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RpcEndpointSet {
    endpoints: HashMap<u64, Vec<String>>,
}

impl RpcEndpointSet {
    pub fn new(endpoints: HashMap<u64, Vec<String>>) -> Self {
        Self { endpoints }
    }

    pub fn defaults() -> Self {
        let endpoints = DEFAULT_RPC_ENDPOINTS
            .iter()
            .map(|(chain_id, urls)| (*chain_id, urls.iter().map(|url| url.to_string()).collect()))
            .collect();
        Self { endpoints }
    }

    pub fn with_overrides(mut self, overrides: HashMap<u64, Vec<String>>) -> Self {
        for (chain_id, urls) in overrides {
            self.endpoints.insert(chain_id, urls);
        }
        self
    }

    /// Candidates for `chain_id`, empty when none are configured
    pub fn candidates(&self, chain_id: u64) -> &[String] {
        self.endpoints.get(&chain_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn chain_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.endpoints.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
