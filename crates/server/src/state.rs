use std::sync::Arc;
use waveforge_core::{
    Config, JobRegistry, MediaOperations, SanitizedConfig, WorkspaceManager,
};

/// Shared application state
pub struct AppState {
    config: Config,
    registry: Arc<JobRegistry>,
    media: Arc<MediaOperations>,
    workspace: Arc<WorkspaceManager>,
}

impl AppState {
    pub fn new(
        config: Config,
        registry: Arc<JobRegistry>,
        media: Arc<MediaOperations>,
        workspace: Arc<WorkspaceManager>,
    ) -> Self {
        Self {
            config,
            registry,
            media,
            workspace,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn media(&self) -> &MediaOperations {
        &self.media
    }

    pub fn workspace(&self) -> &WorkspaceManager {
        &self.workspace
    }
}
