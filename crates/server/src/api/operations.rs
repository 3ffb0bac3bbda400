//! Synchronous conversion handlers (excerpt, merge, cleanup).

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use waveforge_core::{AudioFormat, ConversionArtifact};

use crate::metrics;
use crate::state::AppState;

use super::error::ApiError;

/// Request body for excerpting a time range
#[derive(Debug, Deserialize)]
pub struct ExcerptBody {
    /// Path of the source audio file
    pub input: PathBuf,
    /// Range start in seconds
    pub start: f64,
    /// Range end in seconds (exclusive)
    pub end: f64,
    /// Output format (defaults to mp3)
    #[serde(default)]
    pub format: AudioFormat,
}

/// Request body for merging an ordered list of inputs
#[derive(Debug, Deserialize)]
pub struct MergeBody {
    /// Source files, concatenated in this order
    pub inputs: Vec<PathBuf>,
    /// Output format (defaults to mp3)
    #[serde(default)]
    pub format: AudioFormat,
}

/// Request body for releasing a finished artifact
#[derive(Debug, Deserialize)]
pub struct CleanupBody {
    /// Artifact path previously returned by an operation
    pub path: PathBuf,
}

/// Response for a finished conversion
#[derive(Debug, Serialize)]
pub struct ArtifactResponse {
    pub path: String,
    pub size_bytes: u64,
    pub format: AudioFormat,
}

impl From<ConversionArtifact> for ArtifactResponse {
    fn from(artifact: ConversionArtifact) -> Self {
        Self {
            path: artifact.path.display().to_string(),
            size_bytes: artifact.size_bytes,
            format: artifact.format,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub status: String,
}

/// Extract a time range of an input into a new artifact.
pub async fn excerpt(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExcerptBody>,
) -> Result<Json<ArtifactResponse>, ApiError> {
    let result = state
        .media()
        .excerpt(&body.input, body.start, body.end, body.format)
        .await;
    record_sync_op("excerpt", result.is_ok());
    Ok(Json(ArtifactResponse::from(result?)))
}

/// Concatenate two or more inputs, in order, into one artifact.
pub async fn merge(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MergeBody>,
) -> Result<Json<ArtifactResponse>, ApiError> {
    let result = state.media().concatenate(&body.inputs, body.format).await;
    record_sync_op("merge", result.is_ok());
    Ok(Json(ArtifactResponse::from(result?)))
}

/// Release a previously returned artifact. Idempotent: releasing a path
/// that is already gone succeeds.
pub async fn cleanup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CleanupBody>,
) -> Result<Json<CleanupResponse>, ApiError> {
    state
        .workspace()
        .release_output(&body.path)
        .await
        .map_err(waveforge_core::MediaError::from)?;
    record_sync_op("cleanup", true);
    Ok(Json(CleanupResponse {
        status: "cleaned".to_string(),
    }))
}

fn record_sync_op(operation: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    metrics::SYNC_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}
