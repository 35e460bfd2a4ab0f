//! CLI binary end to end

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const COUNTER: &str = r#"
[[contexts]]
key = "app"

[[contexts]]
key = "counter"
parent = "app"
state_key = "value"
default_state = 0
reducer = "counter"

[[steps]]
op = "dispatch"
context = "app/counter"
action = { type = "INC" }

[[steps]]
op = "snapshot"
label = "after"
"#;

fn ctxtree(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ctxtree"))
        .env_clear()
        .env("XDG_CONFIG_HOME", config_home)
        .arg("--quiet")
        .args(args)
        .output()
        .expect("failed to run ctxtree")
}

fn write_scenario(dir: &TempDir, contents: &str) -> String {
    let path = dir.path().join("scenario.toml");
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn run_prints_json_report() {
    let dir = TempDir::new().unwrap();
    let scenario = write_scenario(&dir, COUNTER);

    let output = ctxtree(dir.path(), &["run", &scenario, "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let snapshots = report["snapshots"].as_array().unwrap();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0]["label"], "after");
    assert_eq!(
        snapshots[0]["root"],
        serde_json::json!({ "app": { "counter": { "value": 1 } } })
    );
    assert_eq!(snapshots[1]["label"], "final");
}

#[test]
fn run_prints_text_tables() {
    let dir = TempDir::new().unwrap();
    let scenario = write_scenario(&dir, COUNTER);

    let output = ctxtree(dir.path(), &["run", &scenario]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Snapshot: after"));
    assert!(stdout.contains("root/app/counter"));
}

#[test]
fn tree_lists_identities() {
    let dir = TempDir::new().unwrap();
    let scenario = write_scenario(&dir, COUNTER);

    let output = ctxtree(dir.path(), &["tree", &scenario, "--format", "json"]);
    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries[0]["id"], "root/app");
    assert_eq!(entries[1]["id"], "root/app/counter");
    assert_eq!(entries[1]["reducer"], "counter");
}

#[test]
fn config_file_changes_identities() {
    let dir = TempDir::new().unwrap();
    let scenario = write_scenario(&dir, COUNTER);
    let config = dir.path().join("ctxtree.toml");
    std::fs::write(&config, "[hub]\nroot_id = \"top\"\ndelimiter = \".\"\n").unwrap();

    let output = ctxtree(
        dir.path(),
        &["--config", config.to_str().unwrap(), "tree", &scenario, "--format", "json"],
    );
    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries[1]["id"], "top.app.counter");
}

#[test]
fn unknown_context_fails() {
    let dir = TempDir::new().unwrap();
    let scenario = write_scenario(&dir, "[[steps]]\nop = \"destroy\"\ncontext = \"ghost\"\n");

    let output = ctxtree(dir.path(), &["run", &scenario]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown context: ghost"));
}
