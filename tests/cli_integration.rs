//! Integration tests for the gitgraph binary.
//!
//! These tests run the real binary against scripts written to a temp dir.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const MERGE_SCRIPT: &str = r#"{
    "operations": [
        { "op": "commit", "id": "root" },
        { "op": "branch", "name": "feature" },
        { "op": "checkout", "name": "feature" },
        { "op": "commit", "id": "f1" },
        { "op": "checkout", "name": "main" },
        { "op": "commit", "id": "m1" },
        { "op": "merge", "branch": "feature", "id": "M", "tags": ["v1"] }
    ]
}"#;

/// Get a command for running gitgraph with no ambient config.
fn gitgraph(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gitgraph").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("xdg"))
        .env_remove("GITGRAPH_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn version_flag_works() {
    let home = TempDir::new().unwrap();
    gitgraph(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gitgraph"));
}

#[test]
fn layout_prints_geometry_json() {
    let home = TempDir::new().unwrap();
    let script = home.child("merge.json");
    script.write_str(MERGE_SCRIPT).unwrap();

    let output = gitgraph(&home)
        .args(["layout", "--compact"])
        .arg(script.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["orientation"], "LR");
    assert_eq!(json["commit_positions"].as_object().unwrap().len(), 4);
    assert_eq!(json["paths"].as_array().unwrap().len(), 4);
    assert_eq!(json["branch_positions"]["feature"]["index"], 1);
}

#[test]
fn layout_orientation_override() {
    let home = TempDir::new().unwrap();
    let script = home.child("merge.json");
    script.write_str(MERGE_SCRIPT).unwrap();

    gitgraph(&home)
        .args(["layout", "--orientation", "tb"])
        .arg(script.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"orientation\": \"TB\""));
}

#[test]
fn layout_reads_toml_scripts() {
    let home = TempDir::new().unwrap();
    let script = home.child("graph.toml");
    script
        .write_str(
            r#"
orientation = "BT"

[[operations]]
op = "commit"
id = "one"

[[operations]]
op = "commit"
id = "two"
"#,
        )
        .unwrap();

    gitgraph(&home)
        .arg("layout")
        .arg(script.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"BT\"").and(predicate::str::contains("\"two\"")));
}

#[test]
fn check_prints_commit_log() {
    let home = TempDir::new().unwrap();
    let script = home.child("merge.json");
    script.write_str(MERGE_SCRIPT).unwrap();

    gitgraph(&home)
        .arg("check")
        .arg(script.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("M [main] MERGE <- m1,f1 (v1)"))
        .stdout(predicate::str::contains("ok: 4 commits on 2 branches, head M on main"));
}

#[test]
fn check_reports_failing_operation() {
    let home = TempDir::new().unwrap();
    let script = home.child("bad.json");
    script
        .write_str(
            r#"{ "operations": [
                { "op": "commit", "id": "A" },
                { "op": "merge", "branch": "main" }
            ] }"#,
        )
        .unwrap();

    gitgraph(&home)
        .arg("check")
        .arg(script.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("operation 1 (merge) failed"))
        .stderr(predicate::str::contains("into itself"));
}

#[test]
fn missing_script_fails() {
    let home = TempDir::new().unwrap();
    gitgraph(&home)
        .args(["check", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error:"));
}

#[test]
fn config_flag_changes_main_branch() {
    let home = TempDir::new().unwrap();
    let config = home.child("config.toml");
    config.write_str("main_branch_name = \"trunk\"\n").unwrap();
    let script = home.child("one.json");
    script
        .write_str(r#"{ "operations": [ { "op": "commit", "id": "A" } ] }"#)
        .unwrap();

    gitgraph(&home)
        .arg("--config")
        .arg(config.path())
        .arg("check")
        .arg(script.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("A [trunk]"));
}

#[test]
fn config_prints_defaults_and_writes() {
    let home = TempDir::new().unwrap();
    let target = home.child("out/config.toml");

    gitgraph(&home)
        .arg("config")
        .arg("--write")
        .arg(target.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("commit_spacing = 50.0"))
        .stdout(predicate::str::contains("[routing]"));

    target.assert(predicate::path::exists());
    target.assert(predicate::str::contains("main_branch_name = \"main\""));
}

#[test]
fn home_config_is_picked_up() {
    let home = TempDir::new().unwrap();
    home.child(".gitgraph/config.toml")
        .write_str("[layout]\ncommit_spacing = 75.0\n")
        .unwrap();

    gitgraph(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("commit_spacing = 75.0"));
}

#[test]
fn invalid_config_is_rejected() {
    let home = TempDir::new().unwrap();
    let config = home.child("config.toml");
    config.write_str("[routing]\nmin_clearance = 50.0\n").unwrap();

    gitgraph(&home)
        .arg("--config")
        .arg(config.path())
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("reroute_margin"));
}

#[test]
fn completion_generates_script() {
    let home = TempDir::new().unwrap();
    gitgraph(&home)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gitgraph"));
}
