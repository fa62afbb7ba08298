mod analysis;
mod config;
mod errors;
mod llm_client;
mod report;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, API_KEY_VAR};
use crate::llm_client::{GeminiClient, ModelClient};
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("ats_api={},tower_http=info", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    let model = build_model_client(&config)?;

    let state = AppState {
        config: config.clone(),
        model,
        sessions: SessionStore::with_limits(
            config.max_sessions,
            Duration::from_secs(config.session_ttl_secs),
        ),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the Gemini client, or `None` when no API key is configured.
fn build_model_client(config: &Config) -> Result<Option<Arc<dyn ModelClient>>> {
    let Some(api_key) = config.google_api_key.clone() else {
        warn!("{API_KEY_VAR} is not set; analysis requests will be refused until it is configured");
        return Ok(None);
    };

    let client = GeminiClient::new(
        api_key,
        config.gemini_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
        config.llm_max_attempts,
    )?;
    info!(
        "Model client initialized (model: {}, max attempts: {})",
        client.model_name(),
        config.llm_max_attempts
    );

    Ok(Some(Arc::new(client)))
}
