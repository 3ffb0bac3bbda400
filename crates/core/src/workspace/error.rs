//! Error types for the workspace module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while managing workspaces.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// Failed to create a workspace directory (disk full, permissions).
    #[error("failed to allocate workspace at {}: {source}", .path.display())]
    Allocate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to remove a workspace or artifact.
    #[error("failed to release {}: {source}", .path.display())]
    Release {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to promote an artifact out of a workspace.
    #[error("failed to promote artifact to {}: {source}", .dest.display())]
    Promote {
        dest: PathBuf,
        source: std::io::Error,
    },
}
