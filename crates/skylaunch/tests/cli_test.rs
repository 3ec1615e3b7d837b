#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

/// トップレベルのヘルプに全コマンドが表示される
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("skylaunch").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("availability domains"))
        .stdout(predicate::str::contains("launch"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("usage"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("skylaunch").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skylaunch"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_launch_help() {
    let mut cmd = Command::cargo_bin("skylaunch").unwrap();
    cmd.arg("launch")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--max-rounds"))
        .stdout(predicate::str::contains("--zone"));
}

#[test]
fn test_config_show_help() {
    let mut cmd = Command::cargo_bin("skylaunch").unwrap();
    cmd.args(["config", "show", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("skylaunch").unwrap();
    cmd.arg("invalid-command").assert().failure();
}

#[test]
fn test_max_rounds_must_be_a_number() {
    let mut cmd = Command::cargo_bin("skylaunch").unwrap();
    cmd.args(["launch", "--max-rounds", "forever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

/// 設定ファイルがない場所では、クラウドに触れる前に失敗する
#[test]
fn test_launch_without_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("skylaunch").unwrap();
    cmd.current_dir(temp_dir.path())
        .env_remove("SKYLAUNCH_CONFIG")
        .env("HOME", temp_dir.path())
        .env("XDG_CONFIG_HOME", temp_dir.path().join(".config"))
        .arg("launch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("skylaunch init"));
}

#[test]
fn test_launch_with_missing_config_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("nope.json");
    let mut cmd = Command::cargo_bin("skylaunch").unwrap();
    cmd.arg("launch")
        .arg("--config")
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

/// プロバイダ呼び出しより前に検証が走る
#[test]
fn test_launch_rejects_invalid_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("skylaunch.json");
    fs::write(
        &path,
        r#"{
            "compartment_id": "ocid1.compartment.oc1..c",
            "subnet_id": "ocid1.subnet.oc1..s",
            "shape": "VM.Standard.A1.Flex",
            "image_id": "ocid1.image.oc1..i",
            "ocpus": 0
        }"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("skylaunch").unwrap();
    cmd.arg("launch")
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ocpus"));
}

#[test]
fn test_launch_rejects_inverted_backoff() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("skylaunch.json");
    fs::write(
        &path,
        r#"{
            "compartment_id": "ocid1.compartment.oc1..c",
            "subnet_id": "ocid1.subnet.oc1..s",
            "shape": "VM.Standard.A1.Flex",
            "image_id": "ocid1.image.oc1..i",
            "backoff_floor_secs": 900,
            "backoff_ceiling_secs": 600
        }"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("skylaunch").unwrap();
    cmd.arg("launch")
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("backoff_floor_secs"));
}
