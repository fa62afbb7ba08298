pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyses", post(handlers::handle_analyze))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_clear_session),
        )
        .route("/api/v1/sessions/:id/report", get(handlers::handle_report))
        .route(
            "/api/v1/sessions/:id/report.json",
            get(handlers::handle_report_json),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
