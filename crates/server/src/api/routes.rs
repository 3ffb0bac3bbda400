use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{downloads, handlers, operations};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Download jobs
        .route("/downloads", post(downloads::submit_download))
        .route("/downloads/{id}", get(downloads::get_download))
        .route(
            "/downloads/{id}/result",
            post(downloads::take_download_result),
        )
        // Synchronous conversions
        .route("/excerpt", post(operations::excerpt))
        .route("/merge", post(operations::merge))
        .route("/cleanup", post(operations::cleanup))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
}
