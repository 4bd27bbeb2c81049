//! Integration tests for the `pcdex` binary.
//!
//! These validate argument parsing, help output, shell completions, and
//! error handling -- all without requiring a live inventory server.
#![allow(clippy::unwrap_used)]

use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `pcdex` binary with env isolation.
///
/// Clears all `PCDEX_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn pcdex_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("pcdex").unwrap();
    cmd.env("HOME", "/tmp/pcdex-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/pcdex-cli-test-nonexistent")
        .env_remove("PCDEX_SERVER")
        .env_remove("PCDEX_OUTPUT")
        .env_remove("PCDEX_INSECURE")
        .env_remove("PCDEX_CA_CERT")
        .env_remove("PCDEX_TIMEOUT")
        .env_remove("PCDEX_TIMEOUT_SECS");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = pcdex_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    pcdex_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("hardware inventory")
            .and(predicate::str::contains("pcs"))
            .and(predicate::str::contains("tags")),
    );
}

#[test]
fn test_version_flag() {
    pcdex_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pcdex"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let output = pcdex_cmd().arg("frobnicate").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    pcdex_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_config_path_prints_a_location() {
    pcdex_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_server_commands_require_a_server() {
    let output = pcdex_cmd().args(["pcs", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(
        text.contains("No inventory server configured"),
        "expected missing-server diagnostic:\n{text}"
    );
}

// ── Client-side validation (no server contact needed) ───────────────

#[test]
fn test_empty_pc_id_is_a_usage_error() {
    // Port 1 is never listening, but the empty id is rejected before
    // any connection attempt.
    let output = pcdex_cmd()
        .args(["--server", "http://127.0.0.1:1", "pcs", "notes", "", "some note"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("Invalid value"),
        "expected validation diagnostic:\n{text}"
    );
}

#[test]
fn test_unreachable_server_maps_to_connection_exit_code() {
    let output = pcdex_cmd()
        .args(["--server", "http://127.0.0.1:1", "tags", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
}
