//! Integration tests for basic CLI behavior.
//!
//! Tests that the binary exists, accepts standard flags, and each subcommand
//! responds to `--help` with appropriate text.

#![allow(deprecated)] // cargo_bin deprecation, replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `timetab` binary.
fn timetab() -> Command {
    Command::cargo_bin("timetab").expect("binary 'timetab' should be built")
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    timetab()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: timetab"))
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("fragments"))
        .stdout(predicate::str::contains("axes"));
}

#[test]
fn version_flag_shows_semver() {
    timetab()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^timetab \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn no_args_shows_error_and_usage() {
    timetab()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: timetab"));
}

#[test]
fn invalid_subcommand_fails() {
    timetab()
        .arg("this-is-not-a-real-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─── Subcommand help ─────────────────────────────────────────────────────────

#[test]
fn parse_help() {
    timetab()
        .args(["parse", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parse schedule pages"))
        .stdout(predicate::str::contains("<PATHS>"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--strict"))
        .stdout(predicate::str::contains("--day-start"));
}

#[test]
fn parse_requires_a_path() {
    timetab()
        .arg("parse")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<PATHS>"));
}

#[test]
fn parse_rejects_unknown_mode() {
    timetab()
        .args(["parse", "week.html", "--mode", "positional"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn fragments_help() {
    timetab()
        .args(["fragments", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dump the positioned fragments"))
        .stdout(predicate::str::contains("<PATH>"));
}

#[test]
fn axes_help() {
    timetab()
        .args(["axes", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("day columns and time rows"))
        .stdout(predicate::str::contains("--day-start"));
}
