//! Integration tests for the enricher CLI.
//!
//! Every test here fails (or prints help) before any network call: either
//! the credential is missing or the reference is rejected locally.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a clean command instance with no ambient credentials.
fn enricher() -> Command {
  let mut cmd = Command::cargo_bin("enricher").unwrap();
  cmd.env_remove("OPENAI_API_KEY");
  cmd
}

#[test]
fn help_describes_the_pipeline() {
  enricher()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Enrich one arXiv paper"));
}

#[test]
fn missing_credential_stops_the_run() {
  enricher()
    .arg("https://arxiv.org/abs/2301.00001")
    .assert()
    .failure()
    .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn invalid_reference_is_rejected_before_fetching() {
  enricher()
    .arg("https://example.com/paper")
    .env("OPENAI_API_KEY", "test-key")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid paper reference"));
}
