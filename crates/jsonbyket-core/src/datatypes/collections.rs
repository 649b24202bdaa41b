//! Container data types: `array`, `object`, `keyvaluepair`
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use super::numeric::coerce;
use super::DataType;
use crate::context::Conversion;
use crate::error::{Error, Result};
use crate::interpreter::convert_object;
use crate::ruleset::Ruleset;
use crate::value::kind_name;
use serde_json::{Map, Value};

/// Sequences with `minLength`, `maxLength`, `rule` and `rule#<i>`
pub struct ArrayType;

impl ArrayType {
    fn length_entry(
        rule: &Ruleset,
        conversion: &mut Conversion<'_>,
        parent: &str,
        key: &str,
    ) -> Result<Option<usize>> {
        match conversion.rule_value(rule, key, parent)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => match coerce(&value) {
                Some(n) if n.is_infinite() && n > 0.0 => Ok(None),
                Some(n) if n >= 0.0 => Ok(Some(n as usize)),
                _ => Err(Error::schema(format!(
                    "rule entry \"{}\" must be a non-negative number, got {}",
                    key, value
                ))),
            },
        }
    }

    /// Element rule used when the ruleset has no `rule`: the node's default type,
    /// with nested sequences downgraded to strings.
    fn fallback_rule(conversion: &Conversion<'_>, parent: &str) -> Result<Ruleset> {
        let declared = conversion.defaults(parent)?.declared_type();
        let is_sequence = conversion
            .engine()
            .data_type(declared)
            .map(|t| t.is_sequence())
            .unwrap_or(false);
        Ok(Ruleset::of_type(if is_sequence { "string" } else { declared }))
    }
}

impl DataType for ArrayType {
    fn name(&self) -> &str {
        "array"
    }

    fn default_value(&self) -> Value {
        Value::Array(Vec::new())
    }

    fn matches(&self, value: &Value) -> bool {
        value.is_array()
    }

    fn is_sequence(&self) -> bool {
        true
    }

    fn convert(
        &self,
        value: Value,
        rule: &Ruleset,
        conversion: &mut Conversion<'_>,
        parent: &str,
    ) -> Result<Value> {
        let mut items = match value {
            Value::Array(items) => items,
            other => return Err(Error::type_mismatch("array", self.name(), kind_name(&other))),
        };

        let min_length = Self::length_entry(rule, conversion, parent, "minLength")?.unwrap_or(0);
        if items.len() < min_length {
            return Err(conversion.fatal(Error::constraint(
                "array",
                format!(
                    "Array too short! Expected at least {} items, got {}",
                    min_length,
                    items.len()
                ),
            )));
        }
        if let Some(max_length) = Self::length_entry(rule, conversion, parent, "maxLength")? {
            items.truncate(max_length);
        }

        let fallback = match rule.element_rule() {
            Some(_) => None,
            None => Some(Self::fallback_rule(conversion, parent)?),
        };

        let mut converted = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let element_rule = rule
                .index_rule(index)
                .or(rule.element_rule())
                .or(fallback.as_ref())
                .ok_or_else(|| Error::schema("array element rule missing"))?;
            let name = index.to_string();
            converted.push(conversion.convert_single(item, element_rule, parent, &name)?);
        }
        Ok(Value::Array(converted))
    }
}

/// Objects whose properties are described by `rules`
pub struct ObjectType;

impl DataType for ObjectType {
    fn name(&self) -> &str {
        "object"
    }

    fn default_value(&self) -> Value {
        Value::Object(Map::new())
    }

    fn matches(&self, value: &Value) -> bool {
        value.is_object()
    }

    fn convert(
        &self,
        value: Value,
        rule: &Ruleset,
        conversion: &mut Conversion<'_>,
        parent: &str,
    ) -> Result<Value> {
        match value {
            Value::Object(data) => convert_object(conversion, data, rule, parent),
            other => Err(Error::type_mismatch("object", self.name(), kind_name(&other))),
        }
    }
}

/// Mappings whose values all follow the same `rule`; not registered as nodes
pub struct KeyValueType;

impl DataType for KeyValueType {
    fn name(&self) -> &str {
        "keyvaluepair"
    }

    fn default_value(&self) -> Value {
        Value::Object(Map::new())
    }

    fn matches(&self, value: &Value) -> bool {
        value.is_object()
    }

    fn registers_nodes(&self) -> bool {
        false
    }

    fn convert(
        &self,
        value: Value,
        rule: &Ruleset,
        conversion: &mut Conversion<'_>,
        parent: &str,
    ) -> Result<Value> {
        let entries = match value {
            Value::Object(entries) => entries,
            other => {
                return Err(Error::type_mismatch("keyvaluepair", self.name(), kind_name(&other)))
            }
        };

        let empty = Ruleset::empty();
        let element_rule = rule.element_rule().unwrap_or(&empty);
        let mut converted = Map::with_capacity(entries.len());
        for (key, item) in entries {
            let item = conversion.convert_single(item, element_rule, parent, &key)?;
            converted.insert(key, item);
        }
        Ok(Value::Object(converted))
    }
}
