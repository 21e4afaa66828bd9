//! Behavioural smoke tests for the CLI entrypoint.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn cli_without_arguments_prints_usage() {
    let mut cmd = cargo_bin_cmd!("piwait");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn nested_kind_without_sub_resource_is_rejected_before_loading_config() {
    let mut cmd = cargo_bin_cmd!("piwait");
    cmd.args(["wait", "network-port", "net-1"])
        .env_remove("PI_IAM_TOKEN")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("network-port waits need --sub <ID>"));
}

#[test]
fn unknown_kind_is_rejected_by_the_parser() {
    let mut cmd = cargo_bin_cmd!("piwait");
    cmd.args(["wait", "bucket", "b-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'bucket'"));
}

#[test]
fn unsupported_ready_health_is_rejected_by_the_parser() {
    let mut cmd = cargo_bin_cmd!("piwait");
    cmd.args(["wait", "instance", "pvm-1", "--ready-status", "CRITICAL"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'CRITICAL'"));
}
