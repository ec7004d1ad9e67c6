use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use liquidator_core::LiquidatorError;
use thiserror::Error;

/// Error type for the HTTP API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] LiquidatorError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Core(e) => e.code(),
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => match e {
                LiquidatorError::NoHealthyEndpoint { .. } => StatusCode::SERVICE_UNAVAILABLE,
                LiquidatorError::RpcTimeout(_) | LiquidatorError::MonitorTimedOut { .. } => {
                    StatusCode::GATEWAY_TIMEOUT
                }
                LiquidatorError::ContractCall(_)
                | LiquidatorError::ProviderRequestFailed(_)
                | LiquidatorError::PortfolioApi(_) => StatusCode::BAD_GATEWAY,
                LiquidatorError::UnsupportedChain(_) | LiquidatorError::Validation(_) => StatusCode::BAD_REQUEST,
                LiquidatorError::Config(_) | LiquidatorError::Storage(_) | LiquidatorError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.code(),
            "message": self.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (LiquidatorError::no_healthy_endpoint(1), StatusCode::SERVICE_UNAVAILABLE),
            (LiquidatorError::portfolio_api("Invalid AccessKey"), StatusCode::BAD_GATEWAY),
            (LiquidatorError::provider_request("rejected"), StatusCode::BAD_GATEWAY),
            (LiquidatorError::unsupported_chain("heco"), StatusCode::BAD_REQUEST),
            (LiquidatorError::validation("No active swap session"), StatusCode::BAD_REQUEST),
            (LiquidatorError::storage("disk full"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status_code(), status);
        }
        assert_eq!(ApiError::Conflict("busy".to_string()).status_code(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_error_body() {
        let response = ApiError::from(LiquidatorError::portfolio_api("Invalid AccessKey")).error_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "PORTFOLIO_API_ERROR");
        assert_eq!(json["message"], "Invalid AccessKey");
        assert!(json["timestamp"].is_string());
    }
}
