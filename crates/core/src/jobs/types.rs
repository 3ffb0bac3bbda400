//! Types for the job registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lifecycle state of a download job. Terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created, worker not yet consuming tool output.
    Pending,
    /// External tool started, progress is being observed.
    Running,
    /// Finished with an output artifact.
    Completed,
    /// Finished with a recorded error.
    Failed,
}

impl JobStatus {
    /// Whether no further transition can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A download job tracked by the registry.
///
/// Invariant: exactly one of `output_path`/`error` is set once the status is
/// terminal; neither is set before that. Only the worker task owning the job
/// mutates it.
#[derive(Debug, Clone)]
pub(crate) struct Job {
    pub id: String,
    pub status: JobStatus,
    /// Percentage in `[0, 100]`, non-decreasing while running.
    pub progress: f32,
    /// Human-readable progress message.
    pub message: String,
    pub output_path: Option<PathBuf>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Set on the terminal transition; drives the retention sweep.
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(id: String) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            progress: 0.0,
            message: "queued".to_string(),
            output_path: None,
            error: None,
            created_at: Utc::now(),
            finished_at: None,
        }
    }
}

/// Request to fetch and transcode a remote reference.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadRequest {
    /// Remote media reference (http/https URL).
    pub url: String,
}

/// Point-in-time view of a job, returned by status polls.
#[derive(Debug, Clone, Serialize)]
pub struct JobSnapshot {
    pub id: String,
    pub status: JobStatus,
    pub progress: f32,
    pub message: String,
}

/// Successful download result handed to the caller on retrieval.
///
/// Cleanup responsibility for `path` transfers to the caller.
#[derive(Debug, Clone)]
pub struct CompletedDownload {
    pub path: PathBuf,
    pub size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_new_job_is_pending_with_nothing_set() {
        let job = Job::new("abc".to_string());
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.progress, 0.0);
        assert!(job.output_path.is_none());
        assert!(job.error.is_none());
        assert!(job.finished_at.is_none());
    }

    #[test]
    fn test_status_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Running).unwrap(),
            "\"running\""
        );
        let parsed: JobStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, JobStatus::Completed);
    }
}
