use crate::domain::error::ApiError;
use crate::infrastructure::logger::Logger;
use crate::infrastructure::monitoring::MonitoringManager;
use actix_web::web::{Data, Json, Query};
use actix_web::{get, post, put, HttpResponse};
use liquidator_core::{LiquidatorCore, PortfolioFilter, PortfolioOrigin};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ApiKeyRequest {
    pub api_key: String,
}

/// Connect the wallet and load its portfolio, from cache when there is one.
///
/// A swap session opened for a different account is closed first.
#[post("/api/wallet/connect")]
pub async fn connect_wallet(
    core: Data<Arc<LiquidatorCore>>,
    monitoring_manager: Data<Arc<MonitoringManager>>,
) -> Result<HttpResponse, ApiError> {
    let wallet = core.wallet.connect().await?;
    if let Some(session) = core.liquidation.status().await {
        if !session.wallet.eq_ignore_ascii_case(&wallet) {
            core.liquidation.close_session().await;
        }
    }
    let origin = core.portfolio.connect(&wallet).await?;
    monitoring_manager.increment_metric("wallet_connections").await;
    if origin == PortfolioOrigin::Api {
        monitoring_manager.increment_metric("portfolio_refreshes").await;
    }

    let view = core.portfolio.view(&PortfolioFilter::default()).await;
    Ok(HttpResponse::Ok().json(json!({
        "wallet": wallet,
        "origin": origin,
        "token_count": view.token_count,
        "last_updated": view.last_updated,
    })))
}

#[post("/api/wallet/disconnect")]
pub async fn disconnect_wallet(core: Data<Arc<LiquidatorCore>>) -> HttpResponse {
    core.liquidation.close_session().await;
    core.portfolio.disconnect().await;
    core.wallet.disconnect().await;
    HttpResponse::Ok().json(json!({ "success": true }))
}

#[get("/api/settings/api-key")]
pub async fn get_api_key(core: Data<Arc<LiquidatorCore>>) -> Result<HttpResponse, ApiError> {
    let api_key = core.portfolio.api_key().await?;
    Ok(HttpResponse::Ok().json(json!({
        "configured": api_key.is_some(),
        "api_key": api_key,
    })))
}

#[put("/api/settings/api-key")]
pub async fn set_api_key(core: Data<Arc<LiquidatorCore>>, body: Json<ApiKeyRequest>) -> Result<HttpResponse, ApiError> {
    if body.api_key.trim().is_empty() {
        return Err(ApiError::BadRequest("api_key must not be empty".to_string()));
    }
    core.portfolio.set_api_key(&body.api_key).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Filtered, sorted dashboard rows with totals
#[get("/api/portfolio")]
pub async fn get_portfolio(core: Data<Arc<LiquidatorCore>>, filter: Query<PortfolioFilter>) -> HttpResponse {
    HttpResponse::Ok().json(core.portfolio.view(&filter).await)
}

#[post("/api/portfolio/refresh")]
pub async fn refresh_portfolio(
    core: Data<Arc<LiquidatorCore>>,
    monitoring_manager: Data<Arc<MonitoringManager>>,
) -> Result<HttpResponse, ApiError> {
    match core.portfolio.refresh().await {
        Ok(token_count) => {
            monitoring_manager.increment_metric("portfolio_refreshes").await;
            let wallet = core.wallet.address().await.unwrap_or_default();
            Logger::portfolio_refreshed(&wallet, token_count);
            Ok(HttpResponse::Ok().json(json!({ "token_count": token_count })))
        }
        Err(e) => {
            monitoring_manager.increment_metric("portfolio_refresh_failures").await;
            Logger::request_failed(e.code(), &e.to_string());
            Err(e.into())
        }
    }
}
