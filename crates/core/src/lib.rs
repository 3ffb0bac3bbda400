pub mod config;
pub mod invoker;
pub mod jobs;
pub mod media;
pub mod testing;
pub mod workspace;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    ServerConfig,
};
pub use invoker::{Invocation, InvokerError, Outcome, SystemInvoker, ToolInvoker};
pub use jobs::{
    CompletedDownload, DownloadRequest, JobError, JobRegistry, JobSnapshot, JobStatus, JobsConfig,
};
pub use media::{
    AudioFormat, ConversionArtifact, MediaConfig, MediaError, MediaOperations, ToolAvailability,
};
pub use workspace::{WorkspaceConfig, WorkspaceError, WorkspaceHandle, WorkspaceManager};
