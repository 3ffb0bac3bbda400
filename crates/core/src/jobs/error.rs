//! Error types for the job registry.

use thiserror::Error;

use crate::workspace::WorkspaceError;

use super::types::JobStatus;

/// Errors returned by registry lookups and submissions.
#[derive(Debug, Error)]
pub enum JobError {
    /// Malformed request, rejected before any job or workspace exists.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Unknown or already-evicted job id.
    #[error("job not found: {0}")]
    NotFound(String),

    /// Result requested while the job is still non-terminal.
    #[error("job {id} is not finished (status: {status:?})")]
    NotReady { id: String, status: JobStatus },

    /// The job reached its terminal failed state; carries the recorded
    /// reason. Returned by result retrieval, which also evicts the job.
    #[error("download failed: {reason}")]
    Failed { reason: String },

    /// Workspace allocation failed.
    #[error(transparent)]
    Resource(#[from] WorkspaceError),
}
