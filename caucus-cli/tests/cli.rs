//! CLI behavior that needs no network: configuration validation, dry-run
//! refusal, missing-input errors.

use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const ENV_VARS: [&str; 6] = [
    "CONFLUENCE_URL",
    "CONFLUENCE_USERNAME",
    "CONFLUENCE_API_TOKEN",
    "DECISION_PAGE_ID",
    "DECISION_SPACE",
    "DECISION_MD_LOCATION",
];

/// A `caucus` command with a clean environment and a scratch working
/// directory (so no stray `.env` file leaks into the test).
fn caucus_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("caucus"));
    cmd.current_dir(dir);
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn dummy_connection(cmd: &mut Command) {
    cmd.env("CONFLUENCE_URL", "https://example.invalid/wiki")
        .env("CONFLUENCE_USERNAME", "dev@example.com")
        .env("CONFLUENCE_API_TOKEN", "token")
        .env("DECISION_PAGE_ID", "123456")
        .env("DECISION_SPACE", "ENG");
}

#[test]
fn sync_with_no_configuration_lists_every_missing_variable() {
    let dir = TempDir::new().expect("tempdir");
    let output = caucus_cmd(dir.path()).arg("sync").assert().failure();
    let stderr = String::from_utf8(output.get_output().stderr.clone()).expect("stderr utf8");
    for var in ENV_VARS {
        assert!(
            stderr.contains(var),
            "missing-config report should name {var}; got:\n{stderr}"
        );
    }
}

#[test]
fn positional_markdown_file_is_not_reported_missing() {
    let dir = TempDir::new().expect("tempdir");
    let output = caucus_cmd(dir.path())
        .args(["sync", "decisions.md"])
        .assert()
        .failure();
    let stderr = String::from_utf8(output.get_output().stderr.clone()).expect("stderr utf8");
    assert!(!stderr.contains("DECISION_MD_LOCATION"));
    assert!(stderr.contains("CONFLUENCE_URL"));
}

#[test]
fn dry_run_is_refused_before_anything_else() {
    let dir = TempDir::new().expect("tempdir");
    caucus_cmd(dir.path())
        .args(["sync", "decisions.md", "--dry-run"])
        .assert()
        .failure()
        .stderr(contains("--dry-run is not supported"));
}

#[test]
fn missing_markdown_file_fails_before_connecting() {
    let dir = TempDir::new().expect("tempdir");
    let mut cmd = caucus_cmd(dir.path());
    dummy_connection(&mut cmd);
    cmd.args(["sync", "no-such-file.md"])
        .assert()
        .failure()
        .stderr(contains("markdown file not found"));
}

#[test]
fn report_lists_connection_and_page_vars_in_one_error() {
    let dir = TempDir::new().expect("tempdir");
    let output = caucus_cmd(dir.path()).arg("report").assert().failure();
    let stderr = String::from_utf8(output.get_output().stderr.clone()).expect("stderr utf8");
    assert!(stderr.contains("CONFLUENCE_URL"));
    assert!(stderr.contains("CONFLUENCE_USERNAME"));
    assert!(stderr.contains("CONFLUENCE_API_TOKEN"));
    assert!(stderr.contains("DECISION_PAGE_ID"));
    assert!(!stderr.contains("DECISION_MD_LOCATION"));
}

#[test]
fn label_list_requires_space_key() {
    let dir = TempDir::new().expect("tempdir");
    let mut cmd = caucus_cmd(dir.path());
    cmd.env("CONFLUENCE_URL", "https://example.invalid/wiki")
        .env("CONFLUENCE_USERNAME", "dev@example.com")
        .env("CONFLUENCE_API_TOKEN", "token");
    cmd.args(["label", "list"])
        .assert()
        .failure()
        .stderr(contains("DECISION_SPACE"));
}

#[test]
fn help_lists_all_subcommands() {
    let dir = TempDir::new().expect("tempdir");
    caucus_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("sync"))
        .stdout(contains("report"))
        .stdout(contains("label"));
}
