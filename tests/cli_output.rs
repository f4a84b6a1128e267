//! Runs the built binary and checks what lands on stdout and stderr.
//!
//! Run with: cargo test --test cli_output

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn run_binary(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pumpmon_service"))
        .current_dir(dir)
        .env_remove("PUMPMON_CONFIG")
        .env_remove("PUMPMON_INPUT")
        .args(args)
        .output()
        .expect("failed to run pumpmon_service")
}

fn write_fixture(dir: &TempDir) {
    let mut csv = String::from("Timestamp;Level\n");
    for i in 0..30 {
        let level = if i % 10 == 3 { 4.0 } else { 2.0 };
        csv.push_str(&format!("2024-05-{:02} {:02}:00:00;{:.1}\n", 1 + i / 24, i % 24, level));
    }
    fs::write(dir.path().join("levels.csv"), csv).unwrap();
    fs::write(
        dir.path().join("pumpmon.toml"),
        "[input]\nsource = \"levels.csv\"\n\n[logging]\nlevel = \"debug\"\n",
    )
    .unwrap();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_json_stdout_is_parseable_with_info_logging() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(&dir);

    let output = run_binary(dir.path(), &["--format", "json", "--log-level", "info"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap_or_else(|e| {
        panic!("stdout is not JSON ({}):\n{}", e, stdout);
    });
    assert_eq!(json["stats"]["count"], 30);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Loaded levels.csv: 30 readings"), "stderr: {}", stderr);
}

#[test]
fn test_debug_logging_stays_off_stdout() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(&dir);

    let output = run_binary(dir.path(), &["--format", "json"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.trim_start().starts_with('{'), "stdout: {}", stdout);
    assert!(!stdout.contains("[DEBUG]"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[DEBUG]"));
}

#[test]
fn test_shipped_config_renders_json() {
    let output = run_binary(Path::new(env!("CARGO_MANIFEST_DIR")), &["--format", "json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["stats"]["count"], 144);
}

#[test]
fn test_missing_input_fails_with_message_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(&dir);

    let output = run_binary(dir.path(), &["--input", "nowhere.csv"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nowhere.csv"));
}
