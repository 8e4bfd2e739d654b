use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn inspect_prints_tree() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-config"));
    cmd.arg("inspect")
        .arg(fixture("fixtures/fgt-basic.conf"))
        .arg("--depth")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("system global [object]"))
        .stdout(predicate::str::contains("system interface [table, 3 entries]"))
        .stdout(predicate::str::contains("wan1 [object]"))
        .stdout(predicate::str::contains("ip = 192.168.254.99").not());
}

#[test]
fn inspect_path_and_flat_output() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-config"));
    cmd.arg("inspect")
        .arg(fixture("fixtures/fgt-basic.conf"))
        .arg("--path")
        .arg("system interface/wan1")
        .arg("--flat")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "wan1/ip = 192.168.254.99 255.255.255.0",
        ))
        .stdout(predicate::str::contains("wan1/alias = \"uplink primary\""));
}

#[test]
fn inspect_json_for_vdom() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-config"));
    cmd.arg("inspect")
        .arg(fixture("fixtures/fgt-vdom.conf"))
        .arg("--vdom")
        .arg("dmz")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"object\""))
        .stdout(predicate::str::contains("\"transparent\""));
}

#[test]
fn inspect_reports_syntax_errors_with_line() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-config"));
    cmd.arg("inspect")
        .arg(fixture("fixtures/fgt-broken-next.conf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"))
        .stderr(predicate::str::contains("syntax error at line 3"));
}
