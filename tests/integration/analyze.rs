//! Tests for `scabbard analyze` command

use super::common::{TestContext, COFFEE, UNRESOLVED};
use predicates::prelude::*;

#[test]
fn test_analyze_prints_graph_summary() {
    let ctx = TestContext::new();
    let input = ctx.metadata("coffee.yaml", COFFEE);

    ctx.scabbard()
        .arg("analyze")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Components: 1"))
        .stdout(predicate::str::contains(
            "coffee.CoffeeApp (2 module(s), 2 provider(s))",
        ))
        .stdout(predicate::str::contains("Injectable targets: 1"));
}

#[test]
fn test_analyze_reads_metadata_directory() {
    let ctx = TestContext::new();
    ctx.metadata("coffee.yaml", COFFEE);

    ctx.scabbard()
        .arg("analyze")
        .arg(ctx.path("metadata"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Providable targets: 1"));
}

#[test]
fn test_analyze_does_not_validate() {
    let ctx = TestContext::new();
    let input = ctx.metadata("broken.yaml", UNRESOLVED);

    ctx.scabbard()
        .arg("analyze")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Unresolved").not());
}

#[test]
fn test_analyze_missing_input() {
    let ctx = TestContext::new();

    ctx.scabbard()
        .arg("analyze")
        .arg(ctx.path("nowhere.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_analyze_malformed_metadata() {
    let ctx = TestContext::new();
    let input = ctx.metadata("bad.yaml", "classes: {not: a list}");

    ctx.scabbard()
        .arg("analyze")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Metadata error"));
}
