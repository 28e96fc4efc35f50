//! Startup validation tests — no network I/O.
//!
//! These tests verify that bad configuration is rejected before the server
//! binds a port.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("fitgen").unwrap()
}

#[test]
fn unknown_provider_exits_with_error() {
    // Provider resolution fires before the listener is bound
    cmd()
        .env("FITGEN_CONFIG", "/nonexistent/fitgen.toml")
        .env("PROVIDER", "midjourney")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown provider"));
}

#[test]
fn unparseable_config_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    cmd()
        .args(["--config", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}
