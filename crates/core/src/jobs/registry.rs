//! In-memory job registry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::invoker::ToolInvoker;
use crate::media::MediaConfig;
use crate::workspace::WorkspaceManager;

use super::config::JobsConfig;
use super::error::JobError;
use super::types::{CompletedDownload, DownloadRequest, Job, JobSnapshot, JobStatus};
use super::worker;

pub(crate) type JobMap = Arc<RwLock<HashMap<String, Job>>>;

/// Registry of asynchronous download jobs.
///
/// The map behind the `RwLock` is the only shared mutable state; status
/// reads block only on the brief critical section, never on the external
/// process. Exactly one worker task mutates a given job.
pub struct JobRegistry {
    jobs: JobMap,
    invoker: Arc<dyn ToolInvoker>,
    workspace: Arc<WorkspaceManager>,
    media: MediaConfig,
    config: JobsConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl JobRegistry {
    pub fn new(
        invoker: Arc<dyn ToolInvoker>,
        workspace: Arc<WorkspaceManager>,
        media: MediaConfig,
        config: JobsConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            invoker,
            workspace,
            media,
            config,
            shutdown_tx,
        }
    }

    /// Validates the request, stores a pending job, and schedules its worker.
    ///
    /// Returns immediately; never blocks on the external process.
    pub async fn submit(&self, request: DownloadRequest) -> Result<String, JobError> {
        let url = request.url.trim().to_string();
        if url.is_empty() {
            return Err(JobError::Validation("no URL provided".to_string()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(JobError::Validation(format!(
                "unsupported URL scheme: {url}"
            )));
        }

        let id = Uuid::new_v4().to_string();
        self.jobs
            .write()
            .await
            .insert(id.clone(), Job::new(id.clone()));

        info!(job_id = %id, %url, "download job submitted");

        tokio::spawn(worker::run_download(
            Arc::clone(&self.jobs),
            Arc::clone(&self.invoker),
            Arc::clone(&self.workspace),
            self.media.clone(),
            id.clone(),
            url,
        ));

        Ok(id)
    }

    /// Current status and progress of a job.
    pub async fn status(&self, id: &str) -> Result<JobSnapshot, JobError> {
        let jobs = self.jobs.read().await;
        let job = jobs.get(id).ok_or_else(|| JobError::NotFound(id.to_string()))?;
        Ok(JobSnapshot {
            id: job.id.clone(),
            status: job.status,
            progress: job.progress,
            message: job.message.clone(),
        })
    }

    /// Retrieves the terminal result and evicts the job.
    ///
    /// On `Completed` the artifact path is returned and cleanup
    /// responsibility transfers to the caller. On `Failed` the recorded
    /// error is returned. Either way the job is gone afterwards: a second
    /// call yields [`JobError::NotFound`].
    pub async fn take_result(&self, id: &str) -> Result<CompletedDownload, JobError> {
        let job = {
            let mut jobs = self.jobs.write().await;
            let job = jobs.get(id).ok_or_else(|| JobError::NotFound(id.to_string()))?;
            if !job.status.is_terminal() {
                return Err(JobError::NotReady {
                    id: id.to_string(),
                    status: job.status,
                });
            }
            jobs.remove(id).ok_or_else(|| JobError::NotFound(id.to_string()))?
        };

        match job.status {
            JobStatus::Completed => {
                let path = job.output_path.ok_or_else(|| JobError::Failed {
                    reason: "completed job has no output artifact".to_string(),
                })?;
                let size_bytes = tokio::fs::metadata(&path).await.map(|m| m.len()).unwrap_or(0);
                debug!(job_id = %id, artifact = %path.display(), "download result retrieved");
                Ok(CompletedDownload { path, size_bytes })
            }
            JobStatus::Failed => Err(JobError::Failed {
                reason: job
                    .error
                    .unwrap_or_else(|| "unknown failure".to_string()),
            }),
            // Unreachable: terminal checked above.
            other => Err(JobError::NotReady {
                id: id.to_string(),
                status: other,
            }),
        }
    }

    /// Number of jobs currently tracked.
    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Spawns the retention sweep loop.
    ///
    /// Terminal jobs never retrieved within the retention window are evicted
    /// and their artifacts released.
    pub fn start_retention_sweep(&self) {
        let jobs = Arc::clone(&self.jobs);
        let workspace = Arc::clone(&self.workspace);
        let retention = Duration::from_secs(self.config.retention_secs);
        let interval = Duration::from_secs(self.config.sweep_interval_secs.max(1));
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            debug!("retention sweep started");
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        debug!("retention sweep received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        Self::sweep_expired(&jobs, &workspace, retention).await;
                    }
                }
            }
            debug!("retention sweep stopped");
        });
    }

    /// Signals background tasks to stop.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    async fn sweep_expired(jobs: &JobMap, workspace: &Arc<WorkspaceManager>, retention: Duration) {
        let cutoff = chrono::Utc::now()
            - chrono::Duration::from_std(retention).unwrap_or_else(|_| chrono::Duration::zero());

        let expired: Vec<Job> = {
            let mut map = jobs.write().await;
            let ids: Vec<String> = map
                .values()
                .filter(|job| {
                    job.status.is_terminal()
                        && job.finished_at.map(|t| t < cutoff).unwrap_or(false)
                })
                .map(|job| job.id.clone())
                .collect();
            ids.into_iter().filter_map(|id| map.remove(&id)).collect()
        };

        for job in expired {
            info!(job_id = %job.id, status = ?job.status, "evicting unretrieved job");
            if let Some(path) = job.output_path {
                if let Err(e) = workspace.release_output(&path).await {
                    warn!(job_id = %job.id, "failed to release expired artifact: {}", e);
                }
            }
        }
    }
}
