//! Scoped scratch directories for conversion work.
//!
//! Every operation or job acquires exactly one workspace for its lifetime.
//! The [`WorkspaceManager`] owns the scratch root, tracks live entries, and
//! releases them idempotently. Finished artifacts are promoted out of the
//! scratch area into the outputs directory before the workspace is released.

mod config;
mod error;
mod manager;
mod types;

pub use config::WorkspaceConfig;
pub use error::WorkspaceError;
pub use manager::WorkspaceManager;
pub use types::{WorkspaceEntry, WorkspaceHandle};
