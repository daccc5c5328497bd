//! Axum route handler for rendering a profile to HTML.

use axum::extract::State;
use axum::response::Html;
use axum::Json;

use crate::errors::AppError;
use crate::render::render_html;
use crate::schema::validate_identified;
use crate::state::AppState;

/// POST /api/v1/cv/render
///
/// Renders the profile in the request body. The body is validated first so
/// a slot mismatch cannot occur downstream; rendering itself is total.
pub async fn handle_render(
    State(_state): State<AppState>,
    Json(candidate): Json<serde_json::Value>,
) -> Result<Html<String>, AppError> {
    let profile =
        validate_identified(&candidate).map_err(|e| AppError::Validation(e.describe()))?;
    Ok(Html(render_html(&profile)))
}
