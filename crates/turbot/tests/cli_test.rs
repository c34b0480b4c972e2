//! Integration tests for the `turbot` CLI binary.
//!
//! These cover argument parsing, help output, shell completions, offline
//! planning and error exit codes, all without a live workspace.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `turbot` binary with env isolation.
///
/// Clears all `TURBOT_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn turbot_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("turbot");
    cmd.env("HOME", "/tmp/turbot-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/turbot-cli-test-nonexistent")
        .env_remove("TURBOT_PROFILE")
        .env_remove("TURBOT_DEFAULT_PROFILE")
        .env_remove("TURBOT_WORKSPACE")
        .env_remove("TURBOT_ACCESS_KEY")
        .env_remove("TURBOT_SECRET_KEY")
        .env_remove("TURBOT_OUTPUT")
        .env_remove("TURBOT_INSECURE")
        .env_remove("TURBOT_TIMEOUT")
        .env_remove("TURBOT_POLL_INTERVAL")
        .env_remove("TURBOT_POLL_ATTEMPTS")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path.display().to_string()
}

const STORED_RESOURCE: &str = r#"{
    "id": "321",
    "parent": "175",
    "parent_akas": ["175", "tmod:@turbot/turbot#/"],
    "type": "tmod:@turbot/aws#/resource/types/account",
    "body": "{\"Name\": \"acme\", \"Tags\": {\"b\": \"2\", \"a\": \"1\"}}"
}"#;

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = turbot_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    turbot_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("resource")
            .and(predicate::str::contains("folder"))
            .and(predicate::str::contains("mod"))
            .and(predicate::str::contains("control"))
            .and(predicate::str::contains("plan")),
    );
}

#[test]
fn test_version_flag() {
    turbot_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("turbot"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    turbot_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    turbot_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_resource_subcommands_exist() {
    turbot_cmd()
        .args(["resource", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("create")
                .and(predicate::str::contains("read"))
                .and(predicate::str::contains("update"))
                .and(predicate::str::contains("delete"))
                .and(predicate::str::contains("exists"))
                .and(predicate::str::contains("import")),
        );
}

#[test]
fn test_mod_subcommands_exist() {
    turbot_cmd()
        .args(["mod", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("install")
                .and(predicate::str::contains("uninstall"))
                .and(predicate::str::contains("versions")),
        );
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = turbot_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_resource_read_without_workspace() {
    turbot_cmd()
        .args(["resource", "read", "--id", "321"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No workspace configured"));
}

#[test]
fn test_missing_secret_key_is_an_auth_error() {
    turbot_cmd()
        .args([
            "--workspace",
            "https://acme.cloud.turbot.com",
            "--access-key",
            "AK",
            "folder",
            "read",
            "--id",
            "181",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("secret key"));
}

#[test]
fn test_zero_poll_attempts_rejected_before_connecting() {
    turbot_cmd()
        .args([
            "--workspace",
            "https://acme.cloud.turbot.com",
            "--access-key",
            "AK",
            "--secret-key",
            "SK",
            "--poll-attempts",
            "0",
            "mod",
            "read",
            "--id",
            "m1",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("poll_attempts"));
}

#[test]
fn test_resource_create_requires_a_body() {
    let output = turbot_cmd()
        .args(["resource", "create", "--parent", "175", "--type", "t"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--body"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    turbot_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_no_config() {
    turbot_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[defaults]")
                .and(predicate::str::contains("poll_attempts = 40")),
        );
}

// ── Offline plans ───────────────────────────────────────────────────

#[test]
fn test_plan_reordered_body_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let current = write(dir.path(), "current.json", STORED_RESOURCE);
    let desired = write(
        dir.path(),
        "desired.json",
        r#"{
            "parent": "tmod:@turbot/turbot#/",
            "type": "tmod:@turbot/aws#/resource/types/account",
            "body": "{\"Tags\": {\"a\": \"1\", \"b\": \"2\"}, \"Name\": \"acme\"}"
        }"#,
    );

    turbot_cmd()
        .args(["-o", "plain", "plan", "--kind", "resource"])
        .args(["--desired", &desired, "--current", &current])
        .assert()
        .success()
        .stdout("no-op\n");
}

#[test]
fn test_plan_type_change_replaces() {
    let dir = tempfile::tempdir().unwrap();
    let current = write(dir.path(), "current.json", STORED_RESOURCE);
    let desired = write(
        dir.path(),
        "desired.json",
        r#"{
            "parent": "175",
            "type": "tmod:@turbot/aws#/resource/types/region",
            "body": "{\"Name\": \"acme\", \"Tags\": {\"a\": \"1\", \"b\": \"2\"}}"
        }"#,
    );

    turbot_cmd()
        .args(["-o", "table", "plan", "--kind", "resource"])
        .args(["--desired", &desired, "--current", &current])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Plan: replace")
                .and(predicate::str::contains("type"))
                .and(predicate::str::contains("resource/types/region")),
        );
}

#[test]
fn test_plan_without_current_creates() {
    let dir = tempfile::tempdir().unwrap();
    let desired = write(
        dir.path(),
        "folder.json",
        r#"{"parent": "tmod:@turbot/turbot#/", "title": "Acme", "description": "Acme accounts"}"#,
    );

    turbot_cmd()
        .args(["plan", "--kind", "folder", "--desired", &desired])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""action": "create""#));
}

#[test]
fn test_plan_detailed_exitcode() {
    let dir = tempfile::tempdir().unwrap();
    let current = write(
        dir.path(),
        "current.json",
        r#"{"id": "m1", "parent": "175", "org": "turbot", "mod": "aws", "version": "^5",
            "installed_version": "5.1.0", "latest_compatible_version": "5.2.0"}"#,
    );
    let desired = write(
        dir.path(),
        "desired.json",
        r#"{"parent": "175", "org": "turbot", "mod": "aws", "version": "^5"}"#,
    );

    turbot_cmd()
        .args(["-q", "plan", "--kind", "mod", "--detailed-exitcode"])
        .args(["--desired", &desired, "--current", &current])
        .assert()
        .code(2);
}

#[test]
fn test_plan_malformed_state_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let desired = write(dir.path(), "desired.json", "{not json");

    turbot_cmd()
        .args(["plan", "--kind", "resource", "--desired", &desired])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("JSON"));
}
