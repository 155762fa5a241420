use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use runbook_core::error::CoreError;
use runbook_db::StoreError;
use runbook_dispatch::ServiceError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain errors and implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An error from the job facade.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A store-layer error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Service(ServiceError::Store(err)) | AppError::Store(err) => {
                classify_store_error(err)
            }
            AppError::Service(ServiceError::Core(err)) => classify_core_error(err),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - `NotFound` maps to 404: unknown identifiers are indistinguishable
///   from "never existed".
/// - `DuplicateIdentifier` maps to 409.
/// - `Conflict` is a corruption signal and maps to a sanitized 500.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::NotFound(identifier) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Job {identifier} not found"),
        ),
        StoreError::DuplicateIdentifier(_) => {
            (StatusCode::CONFLICT, "CONFLICT", err.to_string())
        }
        StoreError::Conflict { .. } => {
            tracing::error!(error = %err, "Store corruption detected");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        StoreError::Database(db_err) => {
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::InvalidStatus(_) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
        }
        CoreError::DispatchFailure { .. } => {
            tracing::error!(error = %err, "Dispatch failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
