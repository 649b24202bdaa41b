//! Built-in transforms
//!
//! String transforms leave non-strings untouched, numeric transforms leave
//! non-numbers untouched and sequence transforms leave non-lists untouched,
//! so a chain never fails just because a value is of another kind.
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use super::types::Transform;
use crate::context::Conversion;
use crate::error::Result;
use crate::ruleset::Ruleset;
use crate::value::number_value;
use serde_json::Value;
use std::cmp::Ordering;

/// The transforms every [`Engine`](crate::Engine) starts with
pub fn all() -> Vec<Transform> {
    vec![
        Transform::from_fn(lower),
        Transform::from_fn(upper),
        Transform::from_fn(trim),
        Transform::from_fn(round),
        Transform::from_fn(floor),
        Transform::from_fn(ceil),
        Transform::from_fn(abs),
        Transform::from_fn(sort),
        Transform::from_fn(reverse),
        Transform::from_fn(unique),
    ]
}

fn map_str(value: Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}

fn map_number(value: Value, f: impl FnOnce(f64) -> f64) -> Value {
    match &value {
        Value::Number(n) if n.is_i64() || n.is_u64() => value,
        Value::Number(n) => match n.as_f64() {
            Some(x) => whole_or_float(f(x)),
            None => value,
        },
        _ => value,
    }
}

/// Integral results become JSON integers
fn whole_or_float(x: f64) -> Value {
    if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
        Value::from(x as i64)
    } else {
        number_value(x)
    }
}

/// Lowercase a string
pub fn lower(value: Value, _: &Ruleset, _: &Conversion<'_>, _: &str) -> Result<Value> {
    Ok(map_str(value, str::to_lowercase))
}

/// Uppercase a string
pub fn upper(value: Value, _: &Ruleset, _: &Conversion<'_>, _: &str) -> Result<Value> {
    Ok(map_str(value, str::to_uppercase))
}

/// Strip surrounding whitespace from a string
pub fn trim(value: Value, _: &Ruleset, _: &Conversion<'_>, _: &str) -> Result<Value> {
    Ok(map_str(value, |s| s.trim().to_string()))
}

/// Round half away from zero
pub fn round(value: Value, _: &Ruleset, _: &Conversion<'_>, _: &str) -> Result<Value> {
    Ok(map_number(value, f64::round))
}

pub fn floor(value: Value, _: &Ruleset, _: &Conversion<'_>, _: &str) -> Result<Value> {
    Ok(map_number(value, f64::floor))
}

pub fn ceil(value: Value, _: &Ruleset, _: &Conversion<'_>, _: &str) -> Result<Value> {
    Ok(map_number(value, f64::ceil))
}

/// Absolute value; integers keep their integer representation
pub fn abs(value: Value, _: &Ruleset, _: &Conversion<'_>, _: &str) -> Result<Value> {
    Ok(match &value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::from(i.unsigned_abs()),
            (None, Some(x)) if !n.is_u64() => number_value(x.abs()),
            _ => value,
        },
        _ => value,
    })
}

/// Sort a list: nulls, booleans, numbers, strings, then containers
pub fn sort(value: Value, _: &Ruleset, _: &Conversion<'_>, _: &str) -> Result<Value> {
    Ok(match value {
        Value::Array(mut items) => {
            items.sort_by(compare);
            Value::Array(items)
        }
        other => other,
    })
}

/// Reverse a list or a string
pub fn reverse(value: Value, _: &Ruleset, _: &Conversion<'_>, _: &str) -> Result<Value> {
    Ok(match value {
        Value::Array(mut items) => {
            items.reverse();
            Value::Array(items)
        }
        Value::String(s) => Value::String(s.chars().rev().collect()),
        other => other,
    })
}

/// Drop repeated list items, keeping the first occurrence
pub fn unique(value: Value, _: &Ruleset, _: &Conversion<'_>, _: &str) -> Result<Value> {
    Ok(match value {
        Value::Array(items) => {
            let mut kept: Vec<Value> = Vec::with_capacity(items.len());
            for item in items {
                if !kept.contains(&item) {
                    kept.push(item);
                }
            }
            Value::Array(kept)
        }
        other => other,
    })
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
