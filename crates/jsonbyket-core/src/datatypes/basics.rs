//! Scalar data types: `any`, `string`, `number`, `bool`
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use super::numeric::{coerce_finite, NumericConstraints};
use super::DataType;
use crate::context::Conversion;
use crate::error::{Error, Result};
use crate::ruleset::Ruleset;
use serde_json::Value;

/// Matches everything, converts nothing
pub struct AnyType;

impl DataType for AnyType {
    fn name(&self) -> &str {
        "any"
    }

    fn default_value(&self) -> Value {
        Value::Null
    }

    fn matches(&self, _value: &Value) -> bool {
        true
    }

    fn convert(
        &self,
        value: Value,
        _rule: &Ruleset,
        _conversion: &mut Conversion<'_>,
        _parent: &str,
    ) -> Result<Value> {
        Ok(value)
    }
}

/// Plain strings
pub struct StringType;

impl DataType for StringType {
    fn name(&self) -> &str {
        "string"
    }

    fn default_value(&self) -> Value {
        Value::String(String::new())
    }

    fn matches(&self, value: &Value) -> bool {
        value.is_string()
    }

    fn convert(
        &self,
        value: Value,
        _rule: &Ruleset,
        _conversion: &mut Conversion<'_>,
        _parent: &str,
    ) -> Result<Value> {
        Ok(match value {
            Value::String(s) => Value::String(s),
            other => Value::String(other.to_string()),
        })
    }
}

/// Numbers with `multiplier`, `int`, `min` and `max`
pub struct NumberType;

impl DataType for NumberType {
    fn name(&self) -> &str {
        "number"
    }

    fn default_value(&self) -> Value {
        Value::from(0)
    }

    fn matches(&self, value: &Value) -> bool {
        coerce_finite(value).is_some()
    }

    fn convert(
        &self,
        value: Value,
        rule: &Ruleset,
        conversion: &mut Conversion<'_>,
        parent: &str,
    ) -> Result<Value> {
        let number = coerce_finite(&value)
            .ok_or_else(|| Error::validation(value.to_string(), "value is not numeric"))?;
        let constraints = NumericConstraints::from_rule(rule, conversion, parent)?;
        Ok(constraints.apply_to_json(number))
    }
}

/// Booleans; registered as both `bool` and `boolean`
pub struct BoolType {
    name: &'static str,
}

impl BoolType {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl DataType for BoolType {
    fn name(&self) -> &str {
        self.name
    }

    fn default_value(&self) -> Value {
        Value::Bool(false)
    }

    fn matches(&self, value: &Value) -> bool {
        value.is_boolean()
    }

    fn convert(
        &self,
        value: Value,
        _rule: &Ruleset,
        _conversion: &mut Conversion<'_>,
        _parent: &str,
    ) -> Result<Value> {
        Ok(Value::Bool(value == Value::Bool(true)))
    }
}
