//! Tests for transform chains
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use super::{built_in, pipeline};
use crate::{Conversion, Engine, Error, Result, Ruleset, ROOT_UID};
use serde_json::{json, Value};

fn engine() -> Engine {
    let mut engine = Engine::new();
    engine.globals_mut().traceback_logging = true;
    engine
}

fn chain(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn run(engine: &Engine, value: Value, names: &[&str]) -> Result<Value> {
    let conversion = Conversion::new(engine);
    pipeline::apply(&conversion, value, &Ruleset::empty(), &chain(names), ROOT_UID)
}

#[test]
fn test_chain_runs_in_order() {
    let engine = engine();
    assert_eq!(
        run(&engine, json!("  Mixed Case "), &["trim", "lower"]).unwrap(),
        json!("mixed case")
    );
    assert_eq!(
        run(&engine, json!([3, 1, 3, 2]), &["unique", "sort", "reverse"]).unwrap(),
        json!([3, 2, 1])
    );
}

#[test]
fn test_empty_chain_is_identity() {
    let engine = engine();
    assert_eq!(run(&engine, json!({"a": 1}), &[]).unwrap(), json!({"a": 1}));
}

#[test]
fn test_unknown_transform() {
    let engine = engine();
    let err = run(&engine, json!(1), &["round", "sparkle"]).unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
    assert!(err
        .to_string()
        .contains("Transform \"sparkle\" does not exist or was never added."));
}

#[test]
fn test_numeric_transforms() {
    let engine = engine();
    assert_eq!(run(&engine, json!(2.5), &["round"]).unwrap(), json!(3));
    assert_eq!(run(&engine, json!(-2.5), &["floor"]).unwrap(), json!(-3));
    assert_eq!(run(&engine, json!(2.1), &["ceil"]).unwrap(), json!(3));
    assert_eq!(run(&engine, json!(-4), &["abs"]).unwrap(), json!(4));
    assert_eq!(run(&engine, json!(-0.5), &["abs"]).unwrap(), json!(0.5));
    assert_eq!(run(&engine, json!("x"), &["round"]).unwrap(), json!("x"));
}

#[test]
fn test_sort_mixed_kinds() {
    let engine = engine();
    assert_eq!(
        run(&engine, json!(["b", 2, null, "a", true, 1.5]), &["sort"]).unwrap(),
        json!([null, true, 1.5, 2, "a", "b"])
    );
}

#[test]
fn test_reverse_string() {
    let engine = engine();
    assert_eq!(run(&engine, json!("abc"), &["reverse"]).unwrap(), json!("cba"));
}

#[test]
fn test_built_in_names() {
    let names: Vec<String> = built_in::all().iter().map(|t| t.name().to_string()).collect();
    assert_eq!(
        names,
        vec!["lower", "upper", "trim", "round", "floor", "ceil", "abs", "sort", "reverse", "unique"]
    );
}

#[test]
fn test_type_suffix_applies_after_conversion() {
    let engine = engine();
    let rules = json!({"rules": {
        "name": {"t": "string:trim,upper"},
        "ratio": {"t": "number:round", "multiplier": 3}
    }});

    let out = engine
        .convert(json!({"name": "  ada ", "ratio": 0.9}), &rules)
        .unwrap();

    assert_eq!(out, json!({"name": "ADA", "ratio": 3}));
}

#[test]
fn test_user_transform_sees_rule_and_parent() {
    fn tag(value: Value, rule: &Ruleset, _: &Conversion<'_>, parent: &str) -> Result<Value> {
        let prefix = rule.get("prefix").and_then(Value::as_str).unwrap_or("");
        Ok(json!(format!("{}{}@{}", prefix, value.as_str().unwrap_or(""), parent)))
    }

    let mut engine = engine();
    engine.add_transform(tag, None);
    let rules = json!({"rules": {"id": {"t": "string:tag", "prefix": "#"}}});

    let out = engine.convert(json!({"id": "7"}), &rules).unwrap();
    assert_eq!(out["id"], json!("#7@ROOT"));
}

#[test]
fn test_transform_errors_propagate() {
    let mut engine = engine();
    engine.add_transform(
        |_: Value, _: &Ruleset, _: &Conversion<'_>, _: &str| -> Result<Value> {
            Err(Error::transform("fail", "always fails"))
        },
        Some("fail"),
    );
    let rules = json!({"rules": {"x": {"t": "any:fail"}}});

    let err = engine.convert(json!({"x": 1}), &rules).unwrap_err();
    assert!(matches!(err, Error::Transform { .. }));
}
