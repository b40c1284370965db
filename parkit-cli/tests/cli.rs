//! Integration tests for the parkit CLI.
//!
//! These tests verify that the CLI binary behaves correctly, including
//! argument parsing, help text, and version output.

use assert_cmd::Command;
use predicates::prelude::*;

fn parkit() -> Command {
    Command::cargo_bin("parkit").expect("Failed to find parkit binary")
}

/// Test that the binary runs without arguments and displays help/error.
#[test]
fn test_cli_no_arguments() {
    parkit()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

/// Test that the --version flag displays version information.
#[test]
fn test_cli_version_flag() {
    parkit()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("parkit"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Test that the --help flag lists every command.
#[test]
fn test_cli_help_flag() {
    let assert = parkit().arg("--help").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    assert!(stdout.contains("Park vehicles, issue tickets and bill departures"));
    for command in ["init", "enter", "exit", "spots", "history", "reset", "completions"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_enter_help_describes_category() {
    parkit()
        .args(["enter", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--category"))
        .stdout(predicate::str::contains("--plate"));
}

#[test]
fn test_unknown_command() {
    parkit()
        .arg("park-everything")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_unknown_category_name_rejected_by_parser() {
    parkit()
        .args(["enter", "--category", "truck", "--plate", "AB1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("truck"));
}

#[test]
fn test_completions_bash() {
    parkit()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("parkit"))
        .stderr(predicate::str::contains("Install with"));
}
