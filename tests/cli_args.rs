//! Tests for the `multiverso-hub` binary: argument parsing and end-to-end
//! runs against the mock catalog.

mod common;

use common::mock_api::{self, MockApi};
use common::temp_config_file;
use std::path::Path;
use std::process::{Command, Output};

fn hub_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_multiverso-hub"))
}

/// Runs the binary off the async runtime so the mock server keeps serving.
async fn run_hub(config: &Path, args: &[&str]) -> Output {
    let config = config.to_path_buf();
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    tokio::task::spawn_blocking(move || {
        hub_cmd()
            .arg("--config")
            .arg(&config)
            .args(&args)
            .output()
            .expect("Failed to execute command")
    })
    .await
    .unwrap()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_help_lists_subcommands() {
    let output = hub_cmd()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for name in ["favorites", "characters", "character", "stats", "--config"] {
        assert!(stdout.contains(name), "help is missing {}: {}", name, stdout);
    }
}

#[test]
fn test_invalid_status_exits_with_usage_error() {
    let output = hub_cmd()
        .args(["characters", "--status", "zombie"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown status"));
}

#[test]
fn test_missing_subcommand_shows_error() {
    let output = hub_cmd().output().expect("Failed to execute command");
    assert!(!output.status.success());
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api]\nbase_url = \"ftp://nope\"\n").unwrap();

    let output = hub_cmd()
        .arg("--config")
        .arg(&path)
        .args(["favorites", "list"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported scheme"), "stderr: {}", stderr);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_favorites_persist_between_runs() {
    let mock = MockApi::start().await;
    let (_dir, config) = temp_config_file(&mock.base_url());

    let output = run_hub(&config, &["favorites", "list"]).await;
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("No favorites yet."));

    let output = run_hub(&config, &["favorites", "add", "2"]).await;
    assert!(output.status.success(), "{:?}", output);
    assert!(stdout_of(&output).contains(&mock_api::name_of(2)));

    let output = run_hub(&config, &["favorites", "has", "2"]).await;
    assert_eq!(stdout_of(&output).trim(), "true");

    let output = run_hub(&config, &["favorites", "list"]).await;
    assert!(stdout_of(&output).contains(&mock_api::name_of(2)));

    let output = run_hub(&config, &["favorites", "clear"]).await;
    assert!(stdout_of(&output).contains("Cleared 1 favorites."));

    let output = run_hub(&config, &["favorites", "has", "2"]).await;
    assert_eq!(stdout_of(&output).trim(), "false");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_characters_marks_favorites() {
    let mock = MockApi::start().await;
    let (_dir, config) = temp_config_file(&mock.base_url());

    run_hub(&config, &["favorites", "toggle", "1"]).await;
    let output = run_hub(&config, &["characters", "--pages", "2"]).await;
    let stdout = stdout_of(&output);

    assert!(output.status.success());
    assert!(stdout.contains(&format!("♥ {}", mock_api::name_of(1))));
    assert!(stdout.contains("40 of 45 shown, more available"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_telemetry_prints_events() {
    let mock = MockApi::start().await;
    let (_dir, config) = temp_config_file(&mock.base_url());

    let output = run_hub(&config, &["stats", "--show-telemetry"]).await;
    let stdout = stdout_of(&output);

    assert!(output.status.success());
    assert!(stdout.contains("Characters: 45"));
    assert!(stdout.contains("Recent events:"));
    assert!(stdout.contains("[API] success"));
    assert!(stdout.contains("[NAVIGATION] screen_view"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_character_fails() {
    let mock = MockApi::start().await;
    let (_dir, config) = temp_config_file(&mock.base_url());

    let output = run_hub(&config, &["favorites", "add", "9999"]).await;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fetching character #9999"), "stderr: {}", stderr);
}
