//! CLI integration tests

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn lmda(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lmda"))
        .arg("--config")
        .arg(config_dir.join("config.json"))
        .args(args)
        .env_remove("LMDA_API_URL")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute command")
}

fn write_deployment(dir: &Path, body: &str) -> String {
    let path = dir.join("deployment.json");
    std::fs::write(&path, body).unwrap();
    path.display().to_string()
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    let output = lmda(dir.path(), &["--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("LM Deployment Assistant"), "Should show app name");
    assert!(stdout.contains("size"), "Should show size command");
    assert!(stdout.contains("tiers"), "Should show tiers command");
    assert!(stdout.contains("catalogue"), "Should show catalogue command");
    assert!(stdout.contains("config"), "Should show config command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    let output = lmda(dir.path(), &["--version"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("lmda"), "Should show binary name");
}

#[test]
fn test_size_help_lists_flags() {
    let dir = TempDir::new().unwrap();
    let output = lmda(dir.path(), &["size", "--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("--max-load"));
    assert!(stdout.contains("--weight"));
    assert!(stdout.contains("--polling-failover"));
    assert!(stdout.contains("--remote"));
}

#[test]
fn test_size_locally_as_json() {
    let dir = TempDir::new().unwrap();
    let file = write_deployment(
        dir.path(),
        r#"{"sites": [{
            "name": "HQ",
            "devices": {"Linux Servers": {"count": 100}},
            "log_volumes": {"netflow": 1000, "syslog": 500}
        }]}"#,
    );

    let output = lmda(dir.path(), &["--format", "json", "size", &file, "--logs-failover"]);
    assert!(
        output.status.success(),
        "size should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let sizing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let site = &sizing["sites"][0];
    assert_eq!(site["polling"]["tier"], "XL");
    assert_eq!(site["polling"]["placements"][0]["load_percent"], 45);
    assert_eq!(site["logs"]["tier"], "SMALL");
    assert_eq!(site["logs"]["placements"][0]["load_percent"], 19);
    assert_eq!(site["logs"]["placements"][1]["role"], "redundant");
}

#[test]
fn test_size_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let file = write_deployment(dir.path(), r#"{"sites": [{"name": "Branch"}]}"#);
    let out = dir.path().join("sizing.json");

    let output = lmda(
        dir.path(),
        &["size", &file, "--output", out.to_str().unwrap()],
    );
    assert!(output.status.success());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["summary"]["site_count"], 1);
}

#[test]
fn test_size_rejects_zero_max_load() {
    let dir = TempDir::new().unwrap();
    let file = write_deployment(dir.path(), r#"{"sites": [{"name": "HQ"}]}"#);

    let output = lmda(dir.path(), &["size", &file, "--max-load", "0"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max load"), "unexpected stderr: {}", stderr);
}

#[test]
fn test_size_rejects_unknown_weight_method() {
    let dir = TempDir::new().unwrap();
    let file = write_deployment(dir.path(), r#"{"sites": [{"name": "HQ"}]}"#);

    let output = lmda(dir.path(), &["size", &file, "--weight", "telnet=1"]);

    assert!(!output.status.success());
}

#[test]
fn test_config_set_then_size_uses_it() {
    let dir = TempDir::new().unwrap();

    let output = lmda(dir.path(), &["config", "set", "max_load_percent", "40"]);
    assert!(output.status.success());

    let output = lmda(dir.path(), &["--format", "json", "config", "show"]);
    assert!(output.status.success());
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["max_load_percent"], 40.0);
    assert_eq!(shown["api_url"], "http://localhost:8080");

    // 22,500 at 40% needs XXL
    let file = write_deployment(
        dir.path(),
        r#"{"sites": [{"name": "HQ", "devices": {"Linux Servers": {"count": 100}}}]}"#,
    );
    let output = lmda(dir.path(), &["--format", "json", "size", &file]);
    assert!(output.status.success());
    let sizing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(sizing["sites"][0]["polling"]["tier"], "XXL");

    let output = lmda(dir.path(), &["config", "reset"]);
    assert!(output.status.success());
    let output = lmda(dir.path(), &["--format", "json", "config", "show"]);
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["max_load_percent"], 85.0);
}

#[test]
fn test_tiers_as_json() {
    let dir = TempDir::new().unwrap();
    let output = lmda(dir.path(), &["--format", "json", "tiers"]);

    assert!(output.status.success());
    let tiers: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tiers.as_array().unwrap().len(), 5);
    assert_eq!(tiers[0]["name"], "XXL");
}
