//! End-to-end command tests against a mock analysis service

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sales_analyzer_bin(config_dir: &tempfile::TempDir, api_base: &str) -> Command {
    let mut cmd = Command::cargo_bin("sales-analyzer").expect("binary is built");
    cmd.env("SALES_ANALYZER_CONFIG", config_dir.path().join("config.toml"))
        .env("SALES_ANALYZER_API_BASE", api_base)
        .env_remove("SALES_ANALYZER_BACKEND")
        .env_remove("RUST_LOG");
    cmd
}

/// Run a command off the async runtime the mock server lives on
async fn run(mut cmd: Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .expect("command thread panicked")
}

async fn mount_job(server: &MockServer, status: &str, error: Option<&str>) {
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"job_id": "j1", "status": "queued"})),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs/j1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "j1",
            "status": status,
            "error": error
        })))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn analyze_prints_report_links_when_done() {
    let server = MockServer::start().await;
    mount_job(&server, "done", None).await;

    let dir = tempfile::tempdir().unwrap();
    let call = dir.path().join("call.mp3");
    std::fs::write(&call, b"ID3fake").unwrap();

    let mut cmd = sales_analyzer_bin(&dir, &server.uri());
    cmd.arg("analyze").arg(&call);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("/download/j1/report.pdf"))
        .stdout(predicate::str::contains("/download/j1/report.json"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn analyze_job_error_exits_with_hints() {
    let server = MockServer::start().await;
    mount_job(
        &server,
        "error",
        Some("Pipeline import failed: No module named 'reportlab'"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let call = dir.path().join("call.aac");
    std::fs::write(&call, b"aac-frames").unwrap();

    let mut cmd = sales_analyzer_bin(&dir, &server.uri());
    cmd.arg("analyze").arg(&call);

    run(cmd)
        .await
        .code(1)
        .stdout(predicate::str::contains("report.pdf").not())
        .stderr(predicate::str::contains("No module named 'reportlab'"))
        .stderr(predicate::str::contains("pip install reportlab"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn analyze_no_wait_prints_job_id() {
    let server = MockServer::start().await;
    mount_job(&server, "processing", None).await;

    let dir = tempfile::tempdir().unwrap();
    let call = dir.path().join("call.m4a");
    std::fs::write(&call, b"m4a-frames").unwrap();

    let mut cmd = sales_analyzer_bin(&dir, &server.uri());
    cmd.arg("analyze").arg(&call).arg("--no-wait");

    run(cmd).await.success().stdout(predicate::str::diff("j1\n"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn download_writes_reports() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/j1/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/j1/report.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"talk_ratio": 0.42})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    let mut cmd = sales_analyzer_bin(&dir, &server.uri());
    cmd.args(["download", "j1", "--output-dir"]).arg(&out);

    run(cmd).await.success();

    assert_eq!(std::fs::read(out.join("j1").join("report.pdf")).unwrap(), b"%PDF-1.4");
    let json = std::fs::read_to_string(out.join("j1").join("report.json")).unwrap();
    assert!(json.contains("talk_ratio"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn status_of_unknown_job_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Job not found."})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = sales_analyzer_bin(&dir, &server.uri());
    cmd.args(["status", "nope"]);

    run(cmd)
        .await
        .code(1)
        .stderr(predicate::str::contains("Failed to poll job status."))
        .stderr(predicate::str::contains("Job not found."));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn health_reports_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "error": null})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = sales_analyzer_bin(&dir, &server.uri());
    cmd.arg("health");

    run(cmd).await.success().stderr(predicate::str::contains("healthy"));
}
