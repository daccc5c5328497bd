mod config;
mod document;
mod errors;
mod extraction;
mod llm_client;
mod render;
mod routes;
mod schema;
mod state;
mod storage;
mod tailoring;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::OllamaClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::ProfileStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Generation capability, constructed once and injected everywhere.
    let ollama = OllamaClient::new(config.ollama_base_url.clone(), config.ollama_model.clone());
    info!("LLM client initialized (model: {})", ollama.model());

    let store = ProfileStore::new(config.profile_path.clone(), config.narrative_path.clone());
    info!(
        "profile store at {:?} / {:?}",
        config.profile_path, config.narrative_path
    );

    let state = AppState {
        llm: Arc::new(ollama),
        store,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
