//! Worker task executing one download job.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::invoker::ToolInvoker;
use crate::media::{fetch_invocation, fetched_audio_path, MediaConfig};
use crate::workspace::WorkspaceManager;

use super::progress::{parse_line, ProgressEvent};
use super::registry::JobMap;
use super::types::JobStatus;

/// Runs one fetch-and-transcode job to its terminal state.
///
/// The worker is the only mutator of its job: it allocates the workspace,
/// streams tool output into progress updates, and records the terminal
/// transition. On failure the workspace is released before the state is
/// recorded; on success the artifact is promoted out first.
pub(crate) async fn run_download(
    jobs: JobMap,
    invoker: Arc<dyn ToolInvoker>,
    workspace: Arc<WorkspaceManager>,
    media: MediaConfig,
    id: String,
    url: String,
) {
    let handle = match workspace.allocate("download").await {
        Ok(handle) => handle,
        Err(e) => {
            mark_failed(&jobs, &id, format!("workspace allocation failed: {e}")).await;
            return;
        }
    };

    let invocation = fetch_invocation(&media, &url, &handle.path);

    let (tx, mut rx) = mpsc::channel::<String>(64);
    let progress_jobs = Arc::clone(&jobs);
    let progress_id = id.clone();
    let progress_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            let Some(event) = parse_line(&line) else {
                continue;
            };
            let mut map = progress_jobs.write().await;
            let Some(job) = map.get_mut(&progress_id) else {
                break;
            };
            match event {
                // Never guess past 99% before the terminal transition.
                ProgressEvent::Percent(p) => {
                    let clamped = p.min(99.0);
                    if clamped > job.progress {
                        job.progress = clamped;
                    }
                    job.message = format!("downloading {:.1}%", job.progress);
                }
                ProgressEvent::PostProcessing => {
                    if job.progress < 95.0 {
                        job.progress = 95.0;
                    }
                    job.message = "processing audio".to_string();
                }
            }
        }
    });

    mark_running(&jobs, &id).await;
    let result = invoker.run_streaming(invocation, tx).await;
    let _ = progress_task.await;

    match result {
        Ok(_) => {
            let produced = fetched_audio_path(&handle.path);
            if tokio::fs::metadata(&produced).await.is_err() {
                release_quietly(&workspace, &handle).await;
                mark_failed(&jobs, &id, "audio file not created".to_string()).await;
                return;
            }

            let dest_filename = format!("download_{id}.mp3");
            match workspace.promote(&produced, &dest_filename).await {
                Ok(artifact) => {
                    release_quietly(&workspace, &handle).await;
                    mark_completed(&jobs, &id, artifact).await;
                }
                Err(e) => {
                    release_quietly(&workspace, &handle).await;
                    mark_failed(&jobs, &id, format!("failed to store artifact: {e}")).await;
                }
            }
        }
        Err(e) => {
            release_quietly(&workspace, &handle).await;
            mark_failed(&jobs, &id, e.to_string()).await;
        }
    }
}

async fn mark_running(jobs: &JobMap, id: &str) {
    let mut map = jobs.write().await;
    if let Some(job) = map.get_mut(id) {
        job.status = JobStatus::Running;
        job.message = "downloading".to_string();
    }
}

async fn mark_completed(jobs: &JobMap, id: &str, artifact: PathBuf) {
    let mut map = jobs.write().await;
    if let Some(job) = map.get_mut(id) {
        job.status = JobStatus::Completed;
        job.progress = 100.0;
        job.message = "download complete".to_string();
        job.output_path = Some(artifact.clone());
        job.finished_at = Some(chrono::Utc::now());
        info!(job_id = %id, artifact = %artifact.display(), "download completed");
    }
}

async fn mark_failed(jobs: &JobMap, id: &str, reason: String) {
    let mut map = jobs.write().await;
    if let Some(job) = map.get_mut(id) {
        job.status = JobStatus::Failed;
        job.message = "download failed".to_string();
        job.error = Some(reason.clone());
        job.finished_at = Some(chrono::Utc::now());
        warn!(job_id = %id, "download failed: {}", reason);
    }
}

async fn release_quietly(
    workspace: &Arc<WorkspaceManager>,
    handle: &crate::workspace::WorkspaceHandle,
) {
    if let Err(e) = workspace.release(handle).await {
        warn!(workspace = %handle.path.display(), "workspace release failed: {}", e);
    }
}
