//! CLI integration tests

use std::process::Command;

fn sales_analyzer_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sales-analyzer"));
    cmd.env_remove("SALES_ANALYZER_CONFIG")
        .env_remove("SALES_ANALYZER_API_BASE")
        .env_remove("SALES_ANALYZER_BACKEND");
    cmd
}

#[test]
fn help_output() {
    let output = sales_analyzer_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("recording"));
    assert!(stdout.contains("analyze"));
    assert!(stdout.contains("status"));
    assert!(stdout.contains("download"));
    assert!(stdout.contains("health"));
    assert!(stdout.contains("--api-base"));
}

#[test]
fn analyze_help_lists_options() {
    let output = sales_analyzer_bin()
        .args(["analyze", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--backend"));
    assert!(stdout.contains("--no-wait"));
    assert!(stdout.contains("--download"));
    assert!(stdout.contains("--output-dir"));
}

#[test]
fn version_output() {
    let output = sales_analyzer_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sales-analyzer"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let output = sales_analyzer_bin()
        .args(["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sales-analyzer"));
    assert!(stdout.contains("config.toml"));
}

#[test]
fn config_path_honours_env_override() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("custom.toml");

    let output = sales_analyzer_bin()
        .env("SALES_ANALYZER_CONFIG", &config_path)
        .args(["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), config_path.to_string_lossy());
}

#[test]
fn config_help() {
    let output = sales_analyzer_bin()
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init"));
    assert!(stdout.contains("set"));
    assert!(stdout.contains("get"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("path"));
}

#[test]
fn config_set_get_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    let output = sales_analyzer_bin()
        .env("SALES_ANALYZER_CONFIG", &config_path)
        .args(["config", "set", "api_base", "http://10.0.0.5:8000/"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let output = sales_analyzer_bin()
        .env("SALES_ANALYZER_CONFIG", &config_path)
        .args(["config", "get", "api_base"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "http://10.0.0.5:8000");

    let output = sales_analyzer_bin()
        .env("SALES_ANALYZER_CONFIG", &config_path)
        .args(["config", "get", "backend"])
        .output()
        .expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "(not set)");
}

#[test]
fn invalid_backend_error() {
    let output = sales_analyzer_bin()
        .args(["analyze", "call.mp3", "--backend", "whisper"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid value") || stderr.contains("whisper"),
        "Expected error about invalid backend, got: {}",
        stderr
    );
}

#[test]
fn no_wait_conflicts_with_download() {
    let output = sales_analyzer_bin()
        .args(["analyze", "call.mp3", "--no-wait", "--download"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}
