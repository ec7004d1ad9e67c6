use crate::domain::error::ApiError;
use crate::infrastructure::logger::Logger;
use crate::infrastructure::monitoring::MonitoringManager;
use actix_web::web::{Data, Json};
use actix_web::{delete, get, post, put, HttpResponse};
use liquidator_core::{LiquidatorCore, SwapSubmission, TokenIdentity};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct DestinationRequest {
    pub chain: String,
    pub address: String,
}

/// Select a token to liquidate; answers with the swap widget's request
#[post("/api/swap/session")]
pub async fn open_session(
    core: Data<Arc<LiquidatorCore>>,
    monitoring_manager: Data<Arc<MonitoringManager>>,
    token: Json<TokenIdentity>,
) -> Result<HttpResponse, ApiError> {
    let request = core.liquidation.select_token(&token).await?;
    monitoring_manager.increment_metric("swap_sessions_opened").await;
    Ok(HttpResponse::Ok().json(request))
}

#[get("/api/swap/session")]
pub async fn session_status(core: Data<Arc<LiquidatorCore>>) -> Result<HttpResponse, ApiError> {
    let status = core
        .liquidation
        .status()
        .await
        .ok_or_else(|| ApiError::NotFound("No active swap session".to_string()))?;
    Ok(HttpResponse::Ok().json(status))
}

#[delete("/api/swap/session")]
pub async fn close_session(core: Data<Arc<LiquidatorCore>>) -> HttpResponse {
    core.liquidation.close_session().await;
    HttpResponse::Ok().json(json!({ "success": true }))
}

#[put("/api/swap/destination")]
pub async fn set_destination(
    core: Data<Arc<LiquidatorCore>>,
    body: Json<DestinationRequest>,
) -> Result<HttpResponse, ApiError> {
    core.liquidation.set_destination_token(&body.chain, &body.address).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Widget callback for a sent swap.
///
/// Answers 202 once the submission is accepted; the monitor then runs on the
/// server runtime and reports through notifications and the session status.
#[post("/api/swap/submitted")]
pub async fn swap_submitted(
    core: Data<Arc<LiquidatorCore>>,
    monitoring_manager: Data<Arc<MonitoringManager>>,
    submission: Json<SwapSubmission>,
) -> Result<HttpResponse, ApiError> {
    if core.liquidation.status().await.is_some_and(|status| status.monitoring) {
        monitoring_manager.increment_metric("swap_submissions_rejected").await;
        return Err(ApiError::Conflict(
            "A submitted transaction is already being monitored".to_string(),
        ));
    }

    let accepted = match core.liquidation.accept_submission(submission.into_inner()).await {
        Ok(accepted) => accepted,
        Err(e) => {
            monitoring_manager.increment_metric("swap_submissions_rejected").await;
            return Err(e.into());
        }
    };
    monitoring_manager.increment_metric("swap_submissions").await;

    let transaction = accepted.transaction().clone();
    let tx_hash = format!("{:?}", transaction.tx_hash);
    Logger::swap_submitted(&tx_hash, transaction.chain_id);

    let liquidation = Arc::clone(&core.liquidation);
    let monitoring_manager = Arc::clone(monitoring_manager.get_ref());
    let monitored_hash = tx_hash.clone();
    actix_web::rt::spawn(async move {
        let outcome = liquidation.complete_submission(accepted).await;
        Logger::swap_finished(&monitored_hash, &outcome);
        monitoring_manager.record_outcome(&outcome).await;
    });

    Ok(HttpResponse::Accepted().json(json!({
        "tx_hash": tx_hash,
        "transaction": transaction,
    })))
}

#[get("/api/notifications")]
pub async fn drain_notifications(core: Data<Arc<LiquidatorCore>>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "notifications": core.notifications.drain() }))
}
