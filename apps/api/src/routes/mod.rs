pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as cv;
use crate::render::handlers as render;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile
        .route("/api/v1/cv/upload", post(cv::handle_upload_cv))
        .route(
            "/api/v1/cv",
            get(cv::handle_get_cv).put(cv::handle_put_cv),
        )
        // Narrative
        .route(
            "/api/v1/narrative",
            get(tailoring::handle_get_narrative).put(tailoring::handle_put_narrative),
        )
        // Tailoring + rendering
        .route("/api/v1/cv/tailor", post(tailoring::handle_tailor))
        .route("/api/v1/cv/generate", post(tailoring::handle_generate))
        .route("/api/v1/cv/render", post(render::handle_render))
        .with_state(state)
}
