//! Workspace manager implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use super::config::WorkspaceConfig;
use super::error::WorkspaceError;
use super::types::{WorkspaceEntry, WorkspaceHandle};

/// Allocates and reclaims scoped scratch directories.
///
/// Each workspace is exclusively owned by the operation or job that allocated
/// it until released. Release is idempotent: releasing a workspace twice, or
/// releasing one whose directory is already gone, is a no-op.
pub struct WorkspaceManager {
    config: WorkspaceConfig,
    entries: RwLock<HashMap<Uuid, WorkspaceEntry>>,
}

impl WorkspaceManager {
    /// Creates a new manager. Directories are created lazily on first use.
    pub fn new(config: WorkspaceConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Directory finished artifacts are promoted into.
    pub fn outputs_dir(&self) -> &Path {
        &self.config.outputs_dir
    }

    /// Allocates a fresh scratch directory for the given operation scope.
    pub async fn allocate(&self, scope: &str) -> Result<WorkspaceHandle, WorkspaceError> {
        let id = Uuid::new_v4();
        let path = self.config.root.join(format!("{}-{}", scope, id));

        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|source| WorkspaceError::Allocate {
                path: path.clone(),
                source,
            })?;

        let entry = WorkspaceEntry {
            id,
            path: path.clone(),
            owner_operation: scope.to_string(),
            created_at: chrono::Utc::now(),
        };
        self.entries.write().await.insert(id, entry);

        debug!(scope, workspace = %path.display(), "allocated workspace");

        Ok(WorkspaceHandle {
            id,
            path,
            scope: scope.to_string(),
        })
    }

    /// Releases a workspace, deleting the directory and all its contents.
    ///
    /// Idempotent: a missing directory or an already-released handle is ok.
    pub async fn release(&self, handle: &WorkspaceHandle) -> Result<(), WorkspaceError> {
        self.entries.write().await.remove(&handle.id);

        match tokio::fs::remove_dir_all(&handle.path).await {
            Ok(()) => {
                debug!(workspace = %handle.path.display(), "released workspace");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(WorkspaceError::Release {
                path: handle.path.clone(),
                source,
            }),
        }
    }

    /// Removes a promoted artifact. Idempotent: a missing file is ok.
    pub async fn release_output(&self, path: &Path) -> Result<(), WorkspaceError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                debug!(artifact = %path.display(), "released output artifact");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(WorkspaceError::Release {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Moves a finished artifact out of its workspace into the outputs
    /// directory, returning the promoted path. Falls back to copy-and-remove
    /// when a rename crosses filesystems.
    pub async fn promote(
        &self,
        file: &Path,
        dest_filename: &str,
    ) -> Result<PathBuf, WorkspaceError> {
        let dest = self.config.outputs_dir.join(dest_filename);

        tokio::fs::create_dir_all(&self.config.outputs_dir)
            .await
            .map_err(|source| WorkspaceError::Promote {
                dest: dest.clone(),
                source,
            })?;

        match tokio::fs::rename(file, &dest).await {
            Ok(()) => {}
            Err(_) => {
                // Cross-device rename is not supported, copy instead.
                tokio::fs::copy(file, &dest)
                    .await
                    .map_err(|source| WorkspaceError::Promote {
                        dest: dest.clone(),
                        source,
                    })?;
                if let Err(e) = tokio::fs::remove_file(file).await {
                    warn!(file = %file.display(), "failed to remove source after copy: {}", e);
                }
            }
        }

        Ok(dest)
    }

    /// Number of live workspaces.
    pub async fn active_count(&self) -> usize {
        self.entries.read().await.len()
    }
}
