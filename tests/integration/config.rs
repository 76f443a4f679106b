//! Tests for config resolution through the CLI

use super::common::{TestContext, WRAPPED_CYCLE};
use assert_fs::prelude::*;
use predicates::prelude::*;

#[test]
fn test_project_config_next_to_input() {
    let ctx = TestContext::new();
    let input = ctx.metadata("cycle.yaml", WRAPPED_CYCLE);
    ctx.temp
        .child("metadata/scabbard.yaml")
        .write_str("allow_wrapped_cycles: false\n")
        .unwrap();

    ctx.scabbard()
        .arg("validate")
        .arg(&input)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Dependency cycle detected"));
}

#[test]
fn test_explicit_config_wins() {
    let ctx = TestContext::new();
    let input = ctx.metadata("cycle.yaml", WRAPPED_CYCLE);
    ctx.temp
        .child("metadata/scabbard.yaml")
        .write_str("allow_wrapped_cycles: false\n")
        .unwrap();
    ctx.temp
        .child("lenient.yaml")
        .write_str("allow_wrapped_cycles: true\n")
        .unwrap();

    ctx.scabbard()
        .arg("--config")
        .arg(ctx.path("lenient.yaml"))
        .arg("validate")
        .arg(&input)
        .assert()
        .success();
}

#[test]
fn test_invalid_config_is_rejected() {
    let ctx = TestContext::new();
    let input = ctx.metadata("cycle.yaml", WRAPPED_CYCLE);
    ctx.temp
        .child("bad.yaml")
        .write_str("generated_package: \"\"\n")
        .unwrap();

    ctx.scabbard()
        .arg("validate")
        .arg(&input)
        .arg("--config")
        .arg(ctx.path("bad.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("generated_package cannot be empty"));
}
