//! Workspace configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the workspace manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Root directory for scratch workspaces. One subdirectory per
    /// operation/job is created beneath it.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Directory finished artifacts are promoted into. Artifacts here are
    /// owned by the caller until released via cleanup.
    #[serde(default = "default_outputs_dir")]
    pub outputs_dir: PathBuf,
}

fn default_root() -> PathBuf {
    std::env::temp_dir().join("waveforge-work")
}

fn default_outputs_dir() -> PathBuf {
    std::env::temp_dir().join("waveforge-outputs")
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            outputs_dir: default_outputs_dir(),
        }
    }
}
