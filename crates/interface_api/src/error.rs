//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use domain_reporting::ReportError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unprocessable record: {0}")]
    Unprocessable(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_record", msg.clone()),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone()),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        error!(error = %err, "Debtor report request failed");
        match err {
            ReportError::InvalidRecord(e) => ApiError::Unprocessable(e.to_string()),
            ReportError::SourceUnavailable(_) | ReportError::CacheUnavailable(_) => {
                ApiError::ServiceUnavailable(err.to_string())
            }
            ReportError::CorruptCacheEntry { .. } => ApiError::Internal(err.to_string()),
        }
    }
}
