//! Types for the workspace module.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

/// Handle to an allocated scratch directory.
///
/// The handle is the sole path by which artifacts are addressed while the
/// owning operation runs. Releasing it deletes the directory and everything
/// in it.
#[derive(Debug, Clone)]
pub struct WorkspaceHandle {
    /// Unique id of this workspace.
    pub id: Uuid,
    /// Absolute path of the scratch directory.
    pub path: PathBuf,
    /// Operation that allocated the workspace (e.g. "excerpt", "download").
    pub scope: String,
}

/// Bookkeeping record for a live workspace.
#[derive(Debug, Clone)]
pub struct WorkspaceEntry {
    /// Workspace id.
    pub id: Uuid,
    /// Scratch directory path.
    pub path: PathBuf,
    /// Operation that created the entry.
    pub owner_operation: String,
    /// When the workspace was allocated.
    pub created_at: DateTime<Utc>,
}
