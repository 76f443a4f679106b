//! Tests for `scabbard generate` command

use super::common::{TestContext, COFFEE, UNRESOLVED};
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_generate_writes_artifacts() {
    let ctx = TestContext::new();
    let input = ctx.metadata("coffee.yaml", COFFEE);

    ctx.scabbard()
        .arg("generate")
        .arg(&input)
        .arg("--output")
        .arg(ctx.path("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Providers: 2"))
        .stdout(predicate::str::contains("Bridges: 1"));

    let classes = ctx.temp.child("out/classes");
    classes
        .child("coffee.DripModule$$Provider$0.json")
        .assert(predicate::path::exists());
    classes
        .child("coffee.DripModule$$Provider$1.json")
        .assert(predicate::path::exists());
    classes
        .child("coffee.CoffeeApp$$InjectorConfigurator.json")
        .assert(predicate::path::exists());
    classes
        .child("io.scabbard.generated.KeyRegistry.json")
        .assert(predicate::path::exists());
    ctx.temp
        .child("out/bridges/coffee.DripModule#heater$bridge$0.json")
        .assert(predicate::path::exists());
}

#[test]
fn test_generated_provider_is_json_shape() {
    let ctx = TestContext::new();
    let input = ctx.metadata("coffee.yaml", COFFEE);

    ctx.scabbard()
        .arg("generate")
        .arg(&input)
        .arg("-o")
        .arg(ctx.path("out"))
        .assert()
        .success();

    let content =
        fs::read_to_string(ctx.path("out/classes/coffee.DripModule$$Provider$1.json")).unwrap();
    let shape: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(shape["name"], "coffee.DripModule$$Provider$1");
    assert_eq!(shape["interfaces"][0], "javax.inject.Provider");
    assert_eq!(shape["methods"][0]["name"], "get");
}

#[test]
fn test_generate_uses_default_output_dir() {
    let ctx = TestContext::new();
    let input = ctx.metadata("coffee.yaml", COFFEE);

    ctx.scabbard().arg("generate").arg(&input).assert().success();

    ctx.temp
        .child("scabbard-out/classes")
        .assert(predicate::path::is_dir());
}

#[test]
fn test_generate_refuses_invalid_graph() {
    let ctx = TestContext::new();
    let input = ctx.metadata("broken.yaml", UNRESOLVED);

    ctx.scabbard()
        .arg("generate")
        .arg(&input)
        .arg("--output")
        .arg(ctx.path("out"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("Unresolved dependency coffee.Motor"));

    ctx.temp.child("out").assert(predicate::path::missing());
}
