//! Error types for the media operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::invoker::InvokerError;
use crate::workspace::WorkspaceError;

/// Errors that can occur during a conversion operation.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Malformed request, caught before any resource is allocated.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Excerpt time range outside `0 <= start < end <= duration`.
    #[error("invalid time range: start {start}, end {end} (duration {duration})")]
    InvalidRange {
        start: f64,
        end: f64,
        duration: f64,
    },

    /// Input could not be probed or read.
    #[error("could not read input {}: {reason}", .path.display())]
    UnreadableInput { path: PathBuf, reason: String },

    /// Concatenate requires at least two inputs.
    #[error("at least two inputs are required, got {0}")]
    InsufficientInputs(usize),

    /// Input extension/codec outside the recognized set.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Workspace allocation or release failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// External tool invocation failed.
    #[error(transparent)]
    Tool(#[from] InvokerError),

    /// The tool exited successfully but produced no output artifact.
    #[error("output file not created: {}", .path.display())]
    MissingOutput { path: PathBuf },

    /// I/O error while staging files in a workspace.
    #[error("workspace I/O error: {0}")]
    Io(#[from] std::io::Error),
}
