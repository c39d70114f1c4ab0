//! CLI end-to-end tests
//!
//! Tests for the trackforged command-line interface. None of these reach the
//! network: configs carry no service credentials, so lookups fall back.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the trackforged binary
#[allow(deprecated)]
fn trackforged_cmd() -> Command {
    Command::cargo_bin("trackforged").unwrap()
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Write an offline config and return its path (the dir must outlive it).
fn offline_config(dir: &std::path::Path) -> PathBuf {
    let path = dir.join("trackforged.toml");
    fs::write(
        &path,
        r#"
priority = "radarr"

[languages]
user_languages = []
native_language = "eng"
"#,
    )
    .unwrap();
    path
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = trackforged_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = trackforged_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("trackforged"));
}

#[test]
fn test_cli_decide_help() {
    let mut cmd = trackforged_cmd();
    cmd.args(["decide", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Run a plugin"));
}

#[test]
fn test_cli_probe_help() {
    let mut cmd = trackforged_cmd();
    cmd.args(["probe", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "print its track inventory and faststart status",
        ));
}

#[test]
fn test_cli_check_tools_command() {
    let mut cmd = trackforged_cmd();
    cmd.arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffprobe"));
}

#[test]
fn test_cli_decide_keep_native_host_json() {
    let dir = tempdir().unwrap();
    let config = offline_config(dir.path());

    let mut cmd = trackforged_cmd();
    cmd.arg("-c")
        .arg(&config)
        .args(["decide", "--plugin", "keep-native", "--host-json"])
        .arg(fixture("host_file_mixed.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Process: yes"))
        .stdout(predicate::str::contains(
            "Instruction: -map 0:v -map 0:a:1 -map 0:s:1? -map 0:t? -map 0:d? -c copy",
        ))
        .stdout(predicate::str::contains("Re-queue after processing: yes"));
}

#[test]
fn test_cli_decide_envelope() {
    let dir = tempdir().unwrap();
    let config = offline_config(dir.path());

    let output = trackforged_cmd()
        .arg("-c")
        .arg(&config)
        .args(["decide", "--plugin", "native-lang", "--host-json", "--envelope"])
        .arg(fixture("host_file_mixed.json"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["processFile"], true);
    assert_eq!(
        response["preset"],
        ", -map 0:v -map 0:a:1 -map 0:s:1? -map 0:t? -map 0:d? -c copy -max_muxing_queue_size 9999"
    );
    assert_eq!(response["container"], ".mkv");
    assert_eq!(response["FFmpegMode"], true);
    assert!(response["infoLog"]
        .as_str()
        .unwrap()
        .contains("No metadata found. Falling back to keeping English only."));
}

#[test]
fn test_cli_decide_faststart() {
    let dir = tempdir().unwrap();
    let config = offline_config(dir.path());

    let mut cmd = trackforged_cmd();
    cmd.arg("-c")
        .arg(&config)
        .args(["decide", "--plugin", "faststart"])
        .arg(fixture("plugin_input_mp4.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Process: yes"))
        .stdout(predicate::str::contains("-movflags +faststart"));
}

#[test]
fn test_cli_decide_unknown_plugin() {
    let mut cmd = trackforged_cmd();
    cmd.args(["decide", "--plugin", "transcode"])
        .arg(fixture("plugin_input_mp4.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown plugin"));
}

#[test]
fn test_cli_decide_missing_input() {
    let dir = tempdir().unwrap();
    let config = offline_config(dir.path());

    let mut cmd = trackforged_cmd();
    cmd.arg("-c")
        .arg(&config)
        .args(["decide", "/nonexistent/input.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input file"));
}

#[test]
fn test_cli_validate_config() {
    let dir = tempdir().unwrap();
    let config = offline_config(dir.path());

    let mut cmd = trackforged_cmd();
    cmd.arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_cli_validate_rejects_bad_timeout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "request_timeout_secs = 120\n").unwrap();

    let mut cmd = trackforged_cmd();
    cmd.arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("request_timeout_secs"));
}

#[test]
fn test_cli_probe_missing_file() {
    let mut cmd = trackforged_cmd();
    cmd.args(["probe", "/nonexistent/movie.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
