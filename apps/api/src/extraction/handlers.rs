//! Axum route handlers for CV upload and the stored profile.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::document;
use crate::errors::AppError;
use crate::extraction::ProfileExtractor;
use crate::schema::{validate_identified, IdentifiedProfile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub profile: IdentifiedProfile,
    /// Hyperlink URIs recovered from the document itself, in document order.
    /// Deliberately NOT merged into `profile.links` — reconciling them
    /// against model-emitted labels is a separate future step.
    pub document_links: Vec<String>,
}

/// POST /api/v1/cv/upload
///
/// Multipart upload: extract text from the document, run structured
/// extraction, persist the result as the current profile.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.file_name().map(str::to_string);
        if let Some(name) = name {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
            file = Some((name, bytes.to_vec()));
            break;
        }
    }
    let (filename, bytes) = file
        .ok_or_else(|| AppError::Validation("multipart body contains no file".to_string()))?;

    info!("analyzing uploaded CV {filename} ({} bytes)", bytes.len());
    let extracted = document::extract(&bytes, &filename)?;

    let engine = ProfileExtractor::new(state.llm.clone());
    let profile = engine.extract_profile(&extracted.text).await?;

    state.store.save_profile(&profile).await?;

    Ok(Json(UploadResponse {
        profile,
        document_links: extracted.links,
    }))
}

/// GET /api/v1/cv
pub async fn handle_get_cv(
    State(state): State<AppState>,
) -> Result<Json<IdentifiedProfile>, AppError> {
    let profile = state
        .store
        .load_profile()
        .await?
        .ok_or_else(|| AppError::NotFound("no CV has been uploaded yet".to_string()))?;
    Ok(Json(profile))
}

/// PUT /api/v1/cv
///
/// Replaces the stored profile with a hand-edited one. The body is
/// validated with the same rules as model output, so a bad edit is rejected
/// with every violated field named.
pub async fn handle_put_cv(
    State(state): State<AppState>,
    Json(candidate): Json<serde_json::Value>,
) -> Result<Json<IdentifiedProfile>, AppError> {
    let profile =
        validate_identified(&candidate).map_err(|e| AppError::Validation(e.describe()))?;
    state.store.save_profile(&profile).await?;
    Ok(Json(profile))
}
