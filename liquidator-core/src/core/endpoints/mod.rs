//! Endpoint prober
//!
//! Walks a chain's candidate node URLs in configured order and hands back the
//! first one that answers a block-number query in time. Nothing is cached:
//! every call starts again from the first candidate.

use crate::application::ports::{ChainNode, NodeConnector};
use crate::domain::entities::RpcEndpointSet;
use crate::shared::constants::PROBE_TIMEOUT;
use crate::shared::error::LiquidatorError;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// A node that just passed its liveness check
#[derive(Clone)]
pub struct LiveEndpoint {
    pub chain_id: u64,
    pub url: String,
    pub block_number: u64,
    pub node: Arc<dyn ChainNode>,
}

impl std::fmt::Debug for LiveEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveEndpoint")
            .field("chain_id", &self.chain_id)
            .field("url", &self.url)
            .field("block_number", &self.block_number)
            .finish()
    }
}

/// Liveness of one candidate, for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct EndpointHealth {
    pub url: String,
    pub healthy: bool,
    pub block_number: Option<u64>,
    pub latency_ms: u64,
    pub error: Option<String>,
}

pub struct EndpointProber {
    endpoints: RpcEndpointSet,
    connector: Arc<dyn NodeConnector>,
    probe_timeout: Duration,
}

impl EndpointProber {
    pub fn new(endpoints: RpcEndpointSet, connector: Arc<dyn NodeConnector>) -> Self {
        Self {
            endpoints,
            connector,
            probe_timeout: PROBE_TIMEOUT,
        }
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn endpoints(&self) -> &RpcEndpointSet {
        &self.endpoints
    }

    /// First candidate for `chain_id` that passes the liveness check.
    pub async fn probe(&self, chain_id: u64) -> Result<LiveEndpoint, LiquidatorError> {
        let candidates = self.endpoints.candidates(chain_id);
        if candidates.is_empty() {
            log::warn!("No RPC endpoints configured for chain {}", chain_id);
            return Err(LiquidatorError::no_healthy_endpoint(chain_id));
        }

        for (index, url) in candidates.iter().enumerate() {
            match self.check(chain_id, url).await {
                Ok((node, block_number)) => {
                    log::debug!("Using {} for chain {} at block {}", url, chain_id, block_number);
                    return Ok(LiveEndpoint {
                        chain_id,
                        url: url.clone(),
                        block_number,
                        node,
                    });
                }
                Err(e) => {
                    log::warn!(
                        "Endpoint {} for chain {} failed liveness check ({}/{}): {}",
                        url,
                        chain_id,
                        index + 1,
                        candidates.len(),
                        e
                    );
                }
            }
        }

        log::error!("All {} endpoints for chain {} are unhealthy", candidates.len(), chain_id);
        Err(LiquidatorError::no_healthy_endpoint(chain_id))
    }

    /// Check every candidate for `chain_id`, one after another
    pub async fn health_report(&self, chain_id: u64) -> Vec<EndpointHealth> {
        let mut report = Vec::new();
        for url in self.endpoints.candidates(chain_id) {
            let started = Instant::now();
            let result = self.check(chain_id, url).await;
            let latency_ms = started.elapsed().as_millis() as u64;
            report.push(match result {
                Ok((_, block_number)) => EndpointHealth {
                    url: url.clone(),
                    healthy: true,
                    block_number: Some(block_number),
                    latency_ms,
                    error: None,
                },
                Err(e) => EndpointHealth {
                    url: url.clone(),
                    healthy: false,
                    block_number: None,
                    latency_ms,
                    error: Some(e.to_string()),
                },
            });
        }
        report
    }

    async fn check(&self, chain_id: u64, url: &str) -> Result<(Arc<dyn ChainNode>, u64), LiquidatorError> {
        let node = self.connector.connect(chain_id, url)?;
        let block_number = timeout(self.probe_timeout, node.block_number())
            .await
            .map_err(|_| LiquidatorError::rpc_timeout("eth_blockNumber", self.probe_timeout))??;
        Ok((node, block_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{endpoint_set, FakeConnector, FakeNode, Liveness};

    fn prober(connector: Arc<FakeConnector>, urls: &[&str]) -> EndpointProber {
        EndpointProber::new(endpoint_set(1, urls), connector)
    }

    #[tokio::test]
    async fn test_first_healthy_endpoint_wins() {
        let connector = Arc::new(
            FakeConnector::new()
                .node("https://a", FakeNode::healthy())
                .node("https://b", FakeNode::healthy()),
        );
        let endpoint = prober(connector.clone(), &["https://a", "https://b"]).probe(1).await.unwrap();

        assert_eq!(endpoint.url, "https://a");
        assert_eq!(endpoint.block_number, 1_000);
        assert_eq!(connector.connects(), vec!["https://a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_k_failures_then_success_makes_k_plus_one_attempts() {
        let connector = Arc::new(
            FakeConnector::new()
                .node("https://down", FakeNode::with_liveness(Liveness::Failing))
                .node("https://slow", FakeNode::with_liveness(Liveness::Hanging))
                .node("https://up", FakeNode::healthy())
                .node("https://spare", FakeNode::healthy()),
        );
        let started = tokio::time::Instant::now();
        let endpoint = prober(
            connector.clone(),
            &["https://down", "https://bad-url", "https://slow", "https://up", "https://spare"],
        )
        .probe(1)
        .await
        .unwrap();

        assert_eq!(endpoint.url, "https://up");
        assert_eq!(
            connector.connects(),
            vec!["https://down", "https://bad-url", "https://slow", "https://up"]
        );
        assert_eq!(FakeNode::count(&connector.get("https://spare").block_calls), 0);
        // only the hanging node consumed its probe budget
        assert!(started.elapsed() >= PROBE_TIMEOUT);
        assert!(started.elapsed() < PROBE_TIMEOUT * 2);
    }

    #[tokio::test]
    async fn test_no_endpoints_fails_without_network_call() {
        let connector = Arc::new(FakeConnector::new());
        let result = prober(connector.clone(), &[]).probe(1).await;

        assert_eq!(result.unwrap_err(), LiquidatorError::NoHealthyEndpoint { chain_id: 1 });
        assert!(connector.connects().is_empty());

        let result = prober(connector.clone(), &["https://a"]).probe(137).await;
        assert!(matches!(result, Err(LiquidatorError::NoHealthyEndpoint { chain_id: 137 })));
        assert!(connector.connects().is_empty());
    }

    #[tokio::test]
    async fn test_all_unhealthy() {
        let connector = Arc::new(
            FakeConnector::new()
                .node("https://a", FakeNode::with_liveness(Liveness::Failing))
                .node("https://b", FakeNode::with_liveness(Liveness::Failing)),
        );
        let result = prober(connector.clone(), &["https://a", "https://b"]).probe(1).await;

        assert!(matches!(result, Err(LiquidatorError::NoHealthyEndpoint { .. })));
        assert_eq!(connector.connects().len(), 2);
    }

    #[tokio::test]
    async fn test_probing_is_not_cached() {
        let connector = Arc::new(FakeConnector::new().node("https://a", FakeNode::healthy()));
        let prober = prober(connector.clone(), &["https://a"]);
        prober.probe(1).await.unwrap();
        prober.probe(1).await.unwrap();
        assert_eq!(FakeNode::count(&connector.get("https://a").block_calls), 2);
    }

    #[tokio::test]
    async fn test_health_report_covers_every_candidate() {
        let connector = Arc::new(
            FakeConnector::new()
                .node("https://a", FakeNode::with_liveness(Liveness::Failing))
                .node("https://b", FakeNode::healthy()),
        );
        let report = prober(connector, &["https://a", "https://b"]).health_report(1).await;

        assert_eq!(report.len(), 2);
        assert!(!report[0].healthy);
        assert!(report[0].error.is_some());
        assert!(report[1].healthy);
        assert_eq!(report[1].block_number, Some(1_000));
    }
}
