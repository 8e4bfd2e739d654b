use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn get_prints_set_values() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-config"));
    cmd.arg("get")
        .arg(fixture("fixtures/fgt-basic.conf"))
        .arg("system global admintimeout")
        .assert()
        .success()
        .stdout("30\n");
}

#[test]
fn get_lists_table_keys() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-config"));
    cmd.arg("get")
        .arg(fixture("fixtures/fgt-basic.conf"))
        .arg("firewall policy")
        .assert()
        .success()
        .stdout("1\n2\n");
}

#[test]
fn get_in_vdom_scope() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-config"));
    cmd.arg("get")
        .arg(fixture("fixtures/fgt-vdom.conf"))
        .arg("system settings/manageip")
        .arg("--vdom")
        .arg("dmz")
        .assert()
        .success()
        .stdout("172.16.0.2/24\n");
}

#[test]
fn get_missing_path_fails() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-config"));
    cmd.arg("get")
        .arg(fixture("fixtures/fgt-basic.conf"))
        .arg("system interface/wan9/ip")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'wan9' not found"));
}

#[test]
fn get_vdom_on_plain_config_fails() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-config"));
    cmd.arg("get")
        .arg(fixture("fixtures/fgt-basic.conf"))
        .arg("system global")
        .arg("--vdom")
        .arg("root")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration has no VDOMs"));
}

#[test]
fn get_reads_unclosed_file_as_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("cut.conf");
    fs::write(&path, "config system global\n    set hostname \"fw\"\n").expect("write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-config"));
    cmd.arg("get")
        .arg(&path)
        .arg("system global hostname")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected end of input"));
}

#[test]
fn get_reaches_keys_with_slashes() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("subnets.conf");
    fs::write(
        &path,
        "config firewall address\n    edit \"10.1.1.0/24\"\n        set subnet 10.1.1.0 255.255.255.0\n    next\nend\n",
    )
    .expect("write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-config"));
    cmd.arg("get")
        .arg(&path)
        .arg("firewall address/10.1.1.0/24/subnet")
        .assert()
        .success()
        .stdout("10.1.1.0 255.255.255.0\n");
}
