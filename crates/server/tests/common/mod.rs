//! Common test utilities for integration testing with a scripted invoker.
//!
//! The fixture builds the full router in-process with a [`FakeInvoker`]
//! injected, so conversion and download flows run end to end without
//! ffmpeg or yt-dlp installed.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use waveforge_core::{
    testing::FakeInvoker, Config, JobRegistry, JobsConfig, MediaOperations, ServerConfig,
    ToolInvoker, WorkspaceConfig, WorkspaceManager,
};

/// Re-export fixtures for test convenience
pub use waveforge_core::testing::fixtures;

/// Per-test knobs for fixture construction.
pub struct TestConfig {
    /// Retention window for unretrieved terminal jobs.
    pub retention_secs: u64,
    /// Retention sweep interval.
    pub sweep_interval_secs: u64,
    /// Whether to start the retention sweep task.
    pub start_sweep: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            retention_secs: 600,
            sweep_interval_secs: 30,
            start_sweep: false,
        }
    }
}

/// Test fixture driving the full router in-process.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Scripted invoker - queue tool responses before driving handlers
    pub invoker: Arc<FakeInvoker>,
    /// Temporary directory holding workspaces and outputs
    pub temp_dir: TempDir,
    /// Directory finished artifacts are promoted into
    pub outputs_dir: PathBuf,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with defaults.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom job settings.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let work_root = temp_dir.path().join("work");
        let outputs_dir = temp_dir.path().join("outputs");

        let config = Config {
            server: ServerConfig {
                host: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            workspace: WorkspaceConfig {
                root: work_root,
                outputs_dir: outputs_dir.clone(),
            },
            media: Default::default(),
            jobs: JobsConfig {
                retention_secs: test_config.retention_secs,
                sweep_interval_secs: test_config.sweep_interval_secs,
            },
        };

        let invoker = Arc::new(FakeInvoker::new());
        let workspace = Arc::new(WorkspaceManager::new(config.workspace.clone()));
        let media = Arc::new(MediaOperations::new(
            Arc::clone(&invoker) as Arc<dyn ToolInvoker>,
            Arc::clone(&workspace),
            config.media.clone(),
        ));
        let registry = Arc::new(JobRegistry::new(
            Arc::clone(&invoker) as Arc<dyn ToolInvoker>,
            Arc::clone(&workspace),
            config.media.clone(),
            config.jobs.clone(),
        ));

        if test_config.start_sweep {
            registry.start_retention_sweep();
        }

        let state = Arc::new(waveforge_server::state::AppState::new(
            config, registry, media, workspace,
        ));

        let router = waveforge_server::api::create_router(state);

        Self {
            router,
            invoker,
            temp_dir,
            outputs_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with no body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Poll a download job until it reaches a terminal status.
    ///
    /// Panics if the job is still non-terminal after ~2 seconds.
    pub async fn poll_until_terminal(&self, job_id: &str) -> TestResponse {
        for _ in 0..200 {
            let response = self.get(&format!("/api/v1/downloads/{job_id}")).await;
            assert_eq!(response.status, StatusCode::OK);
            let status = response.body["status"].as_str().unwrap_or("").to_string();
            if status == "completed" || status == "failed" {
                return response;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("job {job_id} did not reach a terminal state");
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let request = match body {
            Some(json_body) => {
                request_builder = request_builder.header("Content-Type", "application/json");
                request_builder
                    .body(Body::from(json_body.to_string()))
                    .unwrap()
            }
            None => {
                if method == "POST" {
                    request_builder = request_builder.header("Content-Type", "application/json");
                    request_builder.body(Body::from("{}")).unwrap()
                } else {
                    request_builder.body(Body::empty()).unwrap()
                }
            }
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
