//! Error handling for the relay

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::upstream::UpstreamError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Upstream(UpstreamError::Timeout(_)) => {
                (StatusCode::GATEWAY_TIMEOUT, "upstream_timeout")
            }
            ApiError::Upstream(UpstreamError::Client(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            ApiError::Upstream(UpstreamError::Request(_)) => {
                (StatusCode::BAD_GATEWAY, "upstream_error")
            }
        };

        tracing::warn!(error = %self, "request failed");

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_status() {
        let error = ApiError::from(UpstreamError::Timeout(120));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_client_error_status() {
        let error = ApiError::from(UpstreamError::Client("tls backend".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display_timeout() {
        let error = ApiError::from(UpstreamError::Timeout(5));
        assert_eq!(
            error.to_string(),
            "Upstream error: provider did not respond within 5 seconds"
        );
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::from(UpstreamError::Timeout(5)).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "upstream_timeout");
        assert_eq!(
            body["message"],
            "Upstream error: provider did not respond within 5 seconds"
        );
    }
}
