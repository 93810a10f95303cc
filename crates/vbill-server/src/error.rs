//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with appropriate HTTP status codes.
//!
//! Recoverable ledger conditions are not errors here: handlers report them as
//! notices in a 200 response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Invalid request with structured details (400).
    #[error("bad request: {message}")]
    InvalidInput {
        message: String,
        details: serde_json::Value,
    },

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),

    /// Resource conflict (409).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, details) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", None),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", None),
            ApiError::InvalidInput { details, .. } => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", Some(details.clone()))
            }
            ApiError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None)
            }
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT", None),
        };
        let message = match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::InternalError(msg)
            | ApiError::Conflict(msg) => msg,
            ApiError::InvalidInput { message, .. } => message,
        };

        let detail = ApiErrorDetail {
            code: code.to_string(),
            message,
            details,
        };
        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<vbill_core::CoreError> for ApiError {
    fn from(err: vbill_core::CoreError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<vbill_storage::StorageError> for ApiError {
    fn from(err: vbill_storage::StorageError) -> Self {
        match &err {
            vbill_storage::StorageError::BillNotFound(_) => ApiError::NotFound(err.to_string()),
            vbill_storage::StorageError::DuplicateBill(_) => ApiError::Conflict(err.to_string()),
            _ => {
                tracing::warn!(error = %err, "store failure");
                ApiError::InternalError(err.to_string())
            }
        }
    }
}
