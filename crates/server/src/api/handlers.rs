use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use waveforge_core::{SanitizedConfig, ToolAvailability};

use crate::metrics;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub tools: ToolAvailability,
    pub jobs_tracked: usize,
}

/// Health check with a live version probe of the external tools.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let tools = state.media().validate_tools().await;
    let status = if tools.all_available() {
        "ok".to_string()
    } else {
        "degraded".to_string()
    };
    Json(HealthResponse {
        status,
        tools,
        jobs_tracked: state.registry().job_count().await,
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// Prometheus text exposition. Gauges are refreshed at scrape time.
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> String {
    metrics::JOBS_TRACKED.set(state.registry().job_count().await as i64);
    metrics::WORKSPACES_ACTIVE.set(state.workspace().active_count().await as i64);
    metrics::render()
}
