//! Integration tests for `pisetup config`.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pisetup(config: &std::path::Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pisetup"));
    cmd.env("NO_COLOR", "1").env("PISETUP_CONFIG", config);
    cmd
}

#[test]
fn test_config_path_honors_env_override() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("custom.yaml");
    pisetup(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.yaml"));
}

#[test]
fn test_config_show_defaults_without_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.yaml");
    pisetup(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fail-fast"))
        .stdout(predicate::str::contains("~/.zshrc"));
    assert!(!path.exists(), "show must not create the file");
}

#[test]
fn test_config_show_json_reflects_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "policy: keep-going\npackages: [git, jq]\n").expect("write");
    let output = pisetup(&path)
        .args(["config", "show", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["policy"], "keep-going");
    assert_eq!(v["packages"], serde_json::json!(["git", "jq"]));
    assert_eq!(v["apt_max_age_hours"], 24);
    assert_eq!(v["profile_lines"][0], "export EDITOR=nvim");
}

#[test]
fn test_config_show_rejects_zero_apt_max_age() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "apt_max_age_hours: 0\n").expect("write");
    pisetup(&path)
        .args(["config", "show"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("apt_max_age_hours must be greater than zero"));
}

#[test]
fn test_config_init_creates_then_leaves_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("nested").join("config.yaml");

    pisetup(&path)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    let written = std::fs::read_to_string(&path).expect("file created");
    assert!(written.contains("policy: fail-fast"));

    std::fs::write(&path, "policy: keep-going\n").expect("write");
    pisetup(&path)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    assert_eq!(
        std::fs::read_to_string(&path).expect("read"),
        "policy: keep-going\n"
    );
}

#[test]
fn test_config_show_rejects_malformed_yaml() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "policy: [not, a, policy]\n").expect("write");
    pisetup(&path)
        .args(["config", "show"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot parse"));
}
