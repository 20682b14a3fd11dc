//! Integration tests for tarpush-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tarpush_core::test_utils::MockEndpoint;
use tarpush_core::test_utils::read_archive;
use tarpush_core::test_utils::unreachable_endpoint;
use tempfile::TempDir;

fn tarpush_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("tarpush");
    cmd.env_remove("RUST_LOG").env_remove("TARPUSH_KEEP_ARCHIVE");
    cmd
}

fn push_cmd(dir: &Path, endpoint: &str, identifier: &str) -> Command {
    let mut cmd = tarpush_cmd();
    cmd.current_dir(dir)
        .env("TARPUSH_ENDPOINT", endpoint)
        .arg("push")
        .arg(identifier);
    cmd
}

#[test]
fn test_version_flag() {
    tarpush_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tarpush"));
}

#[test]
fn test_help_flag() {
    tarpush_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("push"));
}

#[test]
fn test_push_help() {
    tarpush_cmd()
        .arg("push")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("IDENTIFIER"));
}

#[test]
fn test_push_without_identifier_fails() {
    tarpush_cmd()
        .arg("push")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("IDENTIFIER"));
}

#[test]
fn test_push_success_is_silent() {
    let temp = TempDir::new().expect("failed to create temp dir");
    fs::write(temp.path().join("foo.txt"), "bar").unwrap();
    let endpoint = MockEndpoint::respond_with(200);

    push_cmd(temp.path(), endpoint.url(), "billing")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    let request = endpoint.request().expect("endpoint received no request");
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/apis/billing/upload");
    assert_eq!(request.header("content-type"), Some("binary/octet-stream"));
    assert_eq!(
        read_archive(&request.body),
        vec![("foo.txt".to_string(), b"bar".to_vec())]
    );
}

#[test]
fn test_push_skips_excluded_directories() {
    let temp = TempDir::new().expect("failed to create temp dir");
    fs::write(temp.path().join("main.go"), "package main").unwrap();
    fs::create_dir_all(temp.path().join(".git")).unwrap();
    fs::write(temp.path().join(".git/HEAD"), "ref").unwrap();
    fs::create_dir_all(temp.path().join("web/node_modules/dep")).unwrap();
    fs::write(temp.path().join("web/node_modules/dep/index.js"), "x").unwrap();
    let endpoint = MockEndpoint::respond_with(200);

    push_cmd(temp.path(), endpoint.url(), "billing")
        .assert()
        .success();

    let request = endpoint.request().expect("endpoint received no request");
    let names: Vec<String> = read_archive(&request.body)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["main.go"]);
}

#[test]
fn test_push_non_ok_status_fails() {
    let temp = TempDir::new().expect("failed to create temp dir");
    fs::write(temp.path().join("foo.txt"), "bar").unwrap();
    let endpoint = MockEndpoint::respond_with(500);

    push_cmd(temp.path(), endpoint.url(), "billing")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to upload tar file"))
        .stderr(predicate::str::contains("status code 500"));
}

#[test]
fn test_push_unreachable_endpoint_fails() {
    let temp = TempDir::new().expect("failed to create temp dir");
    fs::write(temp.path().join("foo.txt"), "bar").unwrap();
    let endpoint = unreachable_endpoint();

    push_cmd(temp.path(), &endpoint, "billing")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to upload tar file"))
        .stderr(predicate::str::contains(format!(
            "is the service running on {endpoint}"
        )));
}

#[test]
fn test_push_info_logging_via_rust_log() {
    let temp = TempDir::new().expect("failed to create temp dir");
    fs::write(temp.path().join("foo.txt"), "bar").unwrap();
    let endpoint = MockEndpoint::respond_with(200);

    push_cmd(temp.path(), endpoint.url(), "billing")
        .env("RUST_LOG", "info")
        .assert()
        .success()
        .stderr(predicate::str::contains("archive uploaded"));
}
