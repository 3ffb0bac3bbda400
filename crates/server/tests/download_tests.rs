//! Download job lifecycle tests driven through the HTTP surface.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use std::time::Duration;
use waveforge_core::testing::{FakeResponse, OutputSpec};

use common::{TestConfig, TestFixture};

fn fetched_audio(content: &[u8]) -> OutputSpec {
    OutputSpec::FromTemplate {
        ext: "mp3".to_string(),
        content: content.to_vec(),
    }
}

#[tokio::test]
async fn test_submit_empty_url_rejected() {
    let fixture = TestFixture::new().await;

    let response = fixture.post("/api/v1/downloads", json!({ "url": "  " })).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("no URL provided"));
    assert_eq!(fixture.invoker.call_count(), 0);
}

#[tokio::test]
async fn test_submit_non_http_scheme_rejected() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post("/api/v1/downloads", json!({ "url": "ftp://example.com/a" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(fixture.invoker.call_count(), 0);
}

#[tokio::test]
async fn test_download_lifecycle() {
    let fixture = TestFixture::new().await;
    fixture.invoker.push_response(
        FakeResponse::success()
            .with_stdout_lines([
                "[download]  10.0% of 3.40MiB at 1.2MiB/s ETA 00:03",
                "[download]  55.5% of 3.40MiB at 1.2MiB/s ETA 00:01",
                "[download] 100% of 3.40MiB in 00:03",
                "[ExtractAudio] Destination: audio.mp3",
            ])
            .with_output(fetched_audio(b"mp3-payload")),
    );

    let submit = fixture
        .post(
            "/api/v1/downloads",
            json!({ "url": "https://youtube.com/watch?v=abc" }),
        )
        .await;
    assert_eq!(submit.status, StatusCode::ACCEPTED);
    let job_id = submit.body["job_id"].as_str().unwrap().to_string();

    let terminal = fixture.poll_until_terminal(&job_id).await;
    assert_eq!(terminal.body["status"], "completed");
    assert_eq!(terminal.body["progress"], 100.0);

    let result = fixture
        .post_empty(&format!("/api/v1/downloads/{job_id}/result"))
        .await;
    assert_eq!(result.status, StatusCode::OK);
    assert_eq!(result.body["size_bytes"], 11);
    assert_eq!(
        result.body["filename"],
        format!("download_{job_id}.mp3")
    );
    let path = result.body["path"].as_str().unwrap();
    assert!(path.contains(&format!("download_{job_id}.mp3")));
    assert!(std::path::Path::new(path).exists());

    // Retrieval evicts the job.
    let again = fixture
        .post_empty(&format!("/api/v1/downloads/{job_id}/result"))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failed_download_reports_reason_and_evicts() {
    let fixture = TestFixture::new().await;
    fixture
        .invoker
        .push_response(FakeResponse::failure(1, "ERROR: unsupported URL"));

    let submit = fixture
        .post(
            "/api/v1/downloads",
            json!({ "url": "https://example.com/nope" }),
        )
        .await;
    assert_eq!(submit.status, StatusCode::ACCEPTED);
    let job_id = submit.body["job_id"].as_str().unwrap().to_string();

    let terminal = fixture.poll_until_terminal(&job_id).await;
    assert_eq!(terminal.body["status"], "failed");

    let result = fixture
        .post_empty(&format!("/api/v1/downloads/{job_id}/result"))
        .await;
    assert_eq!(result.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(result.body["error"]
        .as_str()
        .unwrap()
        .contains("unsupported URL"));

    let again = fixture
        .post_empty(&format!("/api/v1/downloads/{job_id}/result"))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_result_before_terminal_is_conflict() {
    let fixture = TestFixture::new().await;
    fixture.invoker.push_response(
        FakeResponse::success()
            .with_delay(Duration::from_millis(300))
            .with_output(fetched_audio(b"late")),
    );

    let submit = fixture
        .post(
            "/api/v1/downloads",
            json!({ "url": "https://example.com/slow" }),
        )
        .await;
    let job_id = submit.body["job_id"].as_str().unwrap().to_string();

    let status = fixture.get(&format!("/api/v1/downloads/{job_id}")).await;
    assert_eq!(status.status, StatusCode::OK);
    let observed = status.body["status"].as_str().unwrap();
    assert!(observed == "pending" || observed == "running");

    let result = fixture
        .post_empty(&format!("/api/v1/downloads/{job_id}/result"))
        .await;
    assert_eq!(result.status, StatusCode::CONFLICT);

    // Still retrievable once finished.
    fixture.poll_until_terminal(&job_id).await;
    let result = fixture
        .post_empty(&format!("/api/v1/downloads/{job_id}/result"))
        .await;
    assert_eq!(result.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let fixture = TestFixture::new().await;

    let status = fixture.get("/api/v1/downloads/no-such-job").await;
    assert_eq!(status.status, StatusCode::NOT_FOUND);

    let result = fixture.post_empty("/api/v1/downloads/no-such-job/result").await;
    assert_eq!(result.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_retention_sweep_evicts_unretrieved_job() {
    let fixture = TestFixture::with_config(TestConfig {
        retention_secs: 0,
        sweep_interval_secs: 1,
        start_sweep: true,
    })
    .await;
    fixture
        .invoker
        .push_response(FakeResponse::success().with_output(fetched_audio(b"evicted")));

    let submit = fixture
        .post(
            "/api/v1/downloads",
            json!({ "url": "https://example.com/forgotten" }),
        )
        .await;
    let job_id = submit.body["job_id"].as_str().unwrap().to_string();
    fixture.poll_until_terminal(&job_id).await;

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let status = fixture.get(&format!("/api/v1/downloads/{job_id}")).await;
    assert_eq!(status.status, StatusCode::NOT_FOUND);
}
