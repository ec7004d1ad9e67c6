use crate::infrastructure::monitoring::MonitoringManager;
use actix_web::web::Data;
use actix_web::{get, HttpResponse, Responder};
use liquidator_core::domain::entities::destination_tokens;
use liquidator_core::{LiquidatorCore, NetworkRegistry};
use serde_json::json;
use std::sync::Arc;

#[get("/health")]
pub async fn health(core: Data<Arc<LiquidatorCore>>, monitoring_manager: Data<Arc<MonitoringManager>>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "core_version": liquidator_core::VERSION,
        "uptime_seconds": monitoring_manager.uptime_seconds(),
        "wallet_connected": core.wallet.address().await.is_some(),
    }))
}

#[get("/metrics")]
pub async fn metrics(monitoring_manager: Data<Arc<MonitoringManager>>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(monitoring_manager.render_prometheus().await)
}

/// Known networks with their configured node endpoints and swap destinations
#[get("/api/networks")]
pub async fn networks(core: Data<Arc<LiquidatorCore>>) -> impl Responder {
    let endpoints = core.prober.endpoints();
    let networks: Vec<serde_json::Value> = NetworkRegistry::all()
        .into_iter()
        .map(|network| {
            json!({
                "chain_id": network.chain_id,
                "chain_name": network.chain_name,
                "display_name": network.display_name,
                "logo": network.logo,
                "explorer_url": network.explorer_url,
                "rpc_endpoints": endpoints.candidates(network.chain_id),
                "destination_tokens": destination_tokens(network.chain_name),
            })
        })
        .collect();

    HttpResponse::Ok().json(json!({
        "total_networks": networks.len(),
        "networks": networks,
    }))
}
