//! Axum route handlers for the narrative and the tailoring pipeline.

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::render;
use crate::schema::IdentifiedProfile;
use crate::state::AppState;
use crate::tailoring::ProfileTailor;

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub role_description: String,
}

#[derive(Debug, Serialize)]
pub struct NarrativeResponse {
    pub narrative: String,
}

#[derive(Debug, Deserialize)]
pub struct PutNarrativeRequest {
    pub narrative: String,
}

/// GET /api/v1/narrative
pub async fn handle_get_narrative(
    State(state): State<AppState>,
) -> Result<Json<NarrativeResponse>, AppError> {
    let narrative = state.store.load_narrative().await?;
    Ok(Json(NarrativeResponse { narrative }))
}

/// PUT /api/v1/narrative
pub async fn handle_put_narrative(
    State(state): State<AppState>,
    Json(request): Json<PutNarrativeRequest>,
) -> Result<Json<NarrativeResponse>, AppError> {
    state.store.save_narrative(&request.narrative).await?;
    Ok(Json(NarrativeResponse {
        narrative: request.narrative,
    }))
}

/// POST /api/v1/cv/tailor
///
/// Tailors the stored profile to a role description, returning the new
/// profile as JSON. Identity fields are guaranteed unchanged.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<IdentifiedProfile>, AppError> {
    let tailored = tailor_stored_profile(&state, &request).await?;
    Ok(Json(tailored))
}

/// POST /api/v1/cv/generate
///
/// The one-shot pipeline: tailor the stored profile, then render it to HTML.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Html<String>, AppError> {
    let tailored = tailor_stored_profile(&state, &request).await?;
    Ok(Html(render::render_html(&tailored)))
}

async fn tailor_stored_profile(
    state: &AppState,
    request: &TailorRequest,
) -> Result<IdentifiedProfile, AppError> {
    if request.role_description.trim().is_empty() {
        return Err(AppError::Validation(
            "role_description cannot be empty".to_string(),
        ));
    }

    let base = state
        .store
        .load_profile()
        .await?
        .ok_or_else(|| AppError::NotFound("no CV has been uploaded yet".to_string()))?;
    let narrative = state.store.load_narrative().await?;

    info!(
        "tailoring CV for {} against a {}-char role description",
        base.full_name,
        request.role_description.len()
    );

    let engine = ProfileTailor::new(state.llm.clone());
    let tailored = engine
        .tailor(base, &narrative, &request.role_description)
        .await?;
    Ok(tailored)
}
