use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::document::DocumentError;
use crate::extraction::ExtractionError;
use crate::llm_client::LlmError;
use crate::tailoring::TailoringError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Empty document")]
    EmptyDocument,

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Tailoring error: {0}")]
    Tailoring(#[from] TailoringError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<DocumentError> for AppError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::UnsupportedFormat(name) => AppError::UnsupportedFormat(name),
            DocumentError::EmptyDocument => AppError::EmptyDocument,
            DocumentError::Malformed(detail) => {
                AppError::Validation(format!("document could not be read: {detail}"))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFormat(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                msg.clone(),
            ),
            AppError::EmptyDocument => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_DOCUMENT",
                "The document contains no extractable text".to_string(),
            ),
            AppError::Extraction(e) => {
                llm_pipeline_response("EXTRACTION_FAILED", e, extraction_llm(e))
            }
            AppError::Tailoring(TailoringError::Serialize(e)) => {
                tracing::error!("failed to serialize base profile: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::Tailoring(e) => {
                llm_pipeline_response("TAILORING_FAILED", e, tailoring_llm(e))
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

fn extraction_llm(e: &ExtractionError) -> Option<&LlmError> {
    match e {
        ExtractionError::Generation(llm) => Some(llm),
        _ => None,
    }
}

fn tailoring_llm(e: &TailoringError) -> Option<&LlmError> {
    match e {
        TailoringError::Generation(llm) => Some(llm),
        _ => None,
    }
}

/// Exhausted-retry failures are the user's problem (422, with every violated
/// field in the message); generation transport failures are the backend's
/// (502, or 504 on timeout).
fn llm_pipeline_response(
    exhausted_code: &'static str,
    error: &dyn std::fmt::Display,
    llm: Option<&LlmError>,
) -> (StatusCode, &'static str, String) {
    match llm {
        Some(LlmError::Timeout) => (
            StatusCode::GATEWAY_TIMEOUT,
            "GENERATION_TIMEOUT",
            "The generation call timed out".to_string(),
        ),
        Some(other) => {
            tracing::error!("generation invocation failed: {other}");
            (
                StatusCode::BAD_GATEWAY,
                "GENERATION_UNAVAILABLE",
                "The generation backend failed".to_string(),
            )
        }
        None => (
            StatusCode::UNPROCESSABLE_ENTITY,
            exhausted_code,
            error.to_string(),
        ),
    }
}
