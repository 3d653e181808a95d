use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::GenerationError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Persistence failures are deliberately distinct from generation failures:
/// a PERSISTENCE_ERROR means the content was produced but not saved.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Generation service rejected the credential")]
    CredentialRejected,

    #[error("Generation service error: {0}")]
    Upstream(String),

    #[error("Generation response could not be parsed: {0}")]
    GenerationParse(String),

    #[error("Store error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::CredentialRejected => AppError::CredentialRejected,
            GenerationError::Upstream { status, message } => {
                AppError::Upstream(format!("upstream returned {status}: {message}"))
            }
            GenerationError::Http(e) => AppError::Upstream(e.to_string()),
            GenerationError::EmptyContent => {
                AppError::Upstream("generation service returned empty content".to_string())
            }
            GenerationError::Parse { detail, raw } => {
                // Raw response stays in the logs for diagnostics; it is not
                // leaked to the caller.
                tracing::error!("unparseable generation response: {raw}");
                AppError::GenerationParse(detail)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::CredentialRejected => (
                StatusCode::BAD_GATEWAY,
                "CREDENTIAL_REJECTED",
                "The generation service rejected the supplied API key".to_string(),
            ),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream generation error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The generation service is unavailable or returned an error".to_string(),
                )
            }
            AppError::GenerationParse(msg) => {
                tracing::error!("Generation parse error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_PARSE_ERROR",
                    format!(
                        "The generation service replied but no product record could be extracted: {msg}"
                    ),
                )
            }
            AppError::Persistence(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_ERROR",
                    "The record was generated but could not be saved".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
