//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use drivegen_core::Error as CoreError;
use thiserror::Error;
use tracing::error;

/// Errors surfaced to HTTP callers. Upstream detail is logged server-side
/// and replaced with a generic message on the wire.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Content exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unauthorized => ApiError::Unauthorized,
            CoreError::Upstream(msg) => ApiError::Upstream(msg),
            CoreError::AuthExchange(msg) => ApiError::Upstream(msg),
            CoreError::PayloadTooLarge { limit } => ApiError::PayloadTooLarge { limit },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Not authenticated".to_string())
            }
            ApiError::Upstream(detail) => {
                error!(%detail, "upstream request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Upstream request failed".to_string(),
                )
            }
            ApiError::PayloadTooLarge { limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("Content exceeds the {} byte limit", limit),
            ),
            ApiError::Internal(detail) => {
                error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
