//! Tests for `scabbard validate` command

use super::common::{TestContext, COFFEE, UNRESOLVED, WRAPPED_CYCLE};
use predicates::prelude::*;

#[test]
fn test_validate_valid_graph() {
    let ctx = TestContext::new();
    let input = ctx.metadata("coffee.yaml", COFFEE);

    ctx.scabbard()
        .arg("validate")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Object graph is valid"));
}

#[test]
fn test_validate_reports_unresolved_dependency() {
    let ctx = TestContext::new();
    let input = ctx.metadata("broken.yaml", UNRESOLVED);

    ctx.scabbard()
        .arg("validate")
        .arg(&input)
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Unresolved dependency coffee.Motor in component coffee.CoffeeApp",
        ))
        .stderr(predicate::str::contains("Processing failed with 1 error(s)"));
}

#[test]
fn test_validate_allows_wrapped_cycle() {
    let ctx = TestContext::new();
    let input = ctx.metadata("cycle.yaml", WRAPPED_CYCLE);

    ctx.scabbard()
        .arg("validate")
        .arg(&input)
        .assert()
        .success();
}
