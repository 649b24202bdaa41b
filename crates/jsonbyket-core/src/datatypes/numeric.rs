//! Numeric coercion and the multiplier/int/min/max constraint pipeline
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use crate::context::Conversion;
use crate::error::{Error, Result};
use crate::ruleset::Ruleset;
use crate::value::{number_value, truthy};
use serde_json::Value;

/// Coerce a value to `f64`: numbers, booleans and numeric strings
pub fn coerce(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// [`coerce`] restricted to finite values; `"inf"`, `"nan"` and `"1e400"` do not count as numbers
pub fn coerce_finite(value: &Value) -> Option<f64> {
    coerce(value).filter(|n| n.is_finite())
}

/// Numeric constraints read from a ruleset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericConstraints {
    pub min: f64,
    pub max: f64,
    pub multiplier: f64,
    pub int: bool,
}

impl Default for NumericConstraints {
    fn default() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            multiplier: 1.0,
            int: false,
        }
    }
}

impl NumericConstraints {
    /// Read `min`, `max`, `multiplier` and `int`, resolving variables in them
    pub fn from_rule(
        rule: &Ruleset,
        conversion: &mut Conversion<'_>,
        parent: &str,
    ) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            min: number_entry(rule, conversion, parent, "min")?.unwrap_or(defaults.min),
            max: number_entry(rule, conversion, parent, "max")?.unwrap_or(defaults.max),
            multiplier: number_entry(rule, conversion, parent, "multiplier")?
                .unwrap_or(defaults.multiplier),
            int: conversion
                .rule_value(rule, "int", parent)?
                .map(|flag| truthy(&flag))
                .unwrap_or(defaults.int),
        })
    }

    /// Scale, optionally truncate, then clamp. Out-of-range input is never an error.
    pub fn apply(&self, value: f64) -> f64 {
        let mut value = value * self.multiplier;
        if self.int {
            value = value.trunc();
        }
        value.max(self.min).min(self.max)
    }

    /// [`apply`](Self::apply) and encode as JSON, as an integer when `int` is set.
    ///
    /// A fractional bound can still leave a fractional result; that stays a float.
    pub fn apply_to_json(&self, value: f64) -> Value {
        let value = self.apply(value);
        if self.int && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            Value::from(value as i64)
        } else {
            number_value(value)
        }
    }
}

fn number_entry(
    rule: &Ruleset,
    conversion: &mut Conversion<'_>,
    parent: &str,
    key: &str,
) -> Result<Option<f64>> {
    match conversion.rule_value(rule, key, parent)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => coerce(&value).map(Some).ok_or_else(|| {
            Error::schema(format!("rule entry \"{}\" must be numeric, got {}", key, value))
        }),
    }
}
