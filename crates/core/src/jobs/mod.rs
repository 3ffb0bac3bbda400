//! Asynchronous download jobs.
//!
//! Fetch-and-transcode is the only asynchronous operation: submitting it
//! returns a job id immediately and the caller polls for status until a
//! terminal state is observed, then retrieves the result and triggers
//! cleanup.
//!
//! State machine: `pending -> running -> {completed, failed}`. Terminal
//! states are final. Progress is monotone while running and is clamped below
//! 100 until completion. One tokio task per job does all mutation of that
//! job; readers only take the registry lock, never block on the process.

mod config;
mod error;
mod progress;
mod registry;
mod types;
mod worker;

pub use config::JobsConfig;
pub use error::JobError;
pub use registry::JobRegistry;
pub use types::{CompletedDownload, DownloadRequest, JobSnapshot, JobStatus};
