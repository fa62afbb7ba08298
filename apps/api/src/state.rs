use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ModelClient;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` when no API key is configured; analysis requests are then refused.
    pub model: Option<Arc<dyn ModelClient>>,
    pub sessions: SessionStore,
}
