use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::GenerateText;
use crate::storage::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The generation capability, injected at startup. Engines are built
    /// per-request around it; there is no ambient model singleton.
    pub llm: Arc<dyn GenerateText>,
    pub store: ProfileStore,
    pub config: Config,
}
