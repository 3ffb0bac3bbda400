//! Download job handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use waveforge_core::{DownloadRequest, JobSnapshot};

use crate::metrics;
use crate::state::AppState;

use super::error::ApiError;

/// Response for a submitted download
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub job_id: String,
}

/// Response for a retrieved download result
#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub filename: String,
    pub path: String,
    pub size_bytes: u64,
}

/// Submit a download job; returns immediately with the job id.
pub async fn submit_download(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DownloadRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let job_id = state.registry().submit(request).await?;
    metrics::DOWNLOADS_SUBMITTED_TOTAL.inc();
    Ok((StatusCode::ACCEPTED, Json(SubmitResponse { job_id })))
}

/// Poll the status of a download job.
pub async fn get_download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JobSnapshot>, ApiError> {
    let snapshot = state.registry().status(&id).await?;
    Ok(Json(snapshot))
}

/// Retrieve the terminal result of a download job and evict it.
///
/// A completed job yields the artifact; a failed one yields its recorded
/// error. Either way the job is gone afterwards.
pub async fn take_download_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ResultResponse>, ApiError> {
    let result = state.registry().take_result(&id).await;
    if matches!(
        result,
        Ok(_) | Err(waveforge_core::JobError::Failed { .. })
    ) {
        metrics::DOWNLOAD_RESULTS_RETRIEVED_TOTAL.inc();
    }
    let download = result?;
    let filename = download
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Json(ResultResponse {
        filename,
        path: download.path.display().to_string(),
        size_bytes: download.size_bytes,
    }))
}
