#![allow(clippy::unwrap_used)]
// CLI surface tests: help output, argument validation, and offline error
// behavior. Data commands are covered end-to-end in spiderweb-core's
// wiremock tests; these only exercise the binary's argument layer.

use assert_cmd::Command;
use predicates::prelude::*;

fn spiderweb() -> Command {
    let mut cmd = Command::cargo_bin("spiderweb").unwrap();
    // Keep the test hermetic: no ambient profile/token leakage.
    cmd.env_remove("SPIDERWEB_PROFILE")
        .env_remove("SPIDERWEB_URL")
        .env_remove("SPIDERWEB_TOKEN");
    cmd
}

#[test]
fn help_lists_all_subcommands() {
    spiderweb()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("networks"))
        .stdout(predicate::str::contains("topology"))
        .stdout(predicate::str::contains("alerts"))
        .stdout(predicate::str::contains("endsites"));
}

#[test]
fn version_flag_works() {
    spiderweb()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("spiderweb"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    spiderweb()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn links_rejects_invalid_status_filter() {
    spiderweb()
        .args(["links", "list", "--status", "flapping"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn config_path_prints_a_toml_path() {
    spiderweb()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn data_command_without_backend_fails_with_guidance() {
    spiderweb()
        .args(["--profile", "definitely-not-configured", "networks", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("spiderweb login"));
}

#[test]
fn completions_generate_for_bash() {
    spiderweb()
        .args(["config", "completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_spiderweb"));
}
