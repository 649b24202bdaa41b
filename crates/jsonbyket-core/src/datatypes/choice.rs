//! The `choice` data type
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use super::DataType;
use crate::context::Conversion;
use crate::error::{Error, Result};
use crate::ruleset::Ruleset;
use serde_json::Value;

/// A scalar that must equal one of `options`.
///
/// Options come from the rule, else from the node defaults.
pub struct ChoiceType;

impl ChoiceType {
    fn options(
        rule: &Ruleset,
        conversion: &mut Conversion<'_>,
        parent: &str,
    ) -> Result<Vec<Value>> {
        match conversion.rule_value(rule, "options", parent)? {
            Some(Value::Array(options)) => Ok(options),
            Some(other) => Err(Error::schema(format!(
                "options of a choice rule must be a list, got {}",
                other
            ))),
            None => Ok(conversion
                .defaults(parent)?
                .options()
                .cloned()
                .unwrap_or_default()),
        }
    }
}

impl DataType for ChoiceType {
    fn name(&self) -> &str {
        "choice"
    }

    fn default_value(&self) -> Value {
        Value::Null
    }

    fn matches(&self, value: &Value) -> bool {
        !(value.is_array() || value.is_object())
    }

    fn convert(
        &self,
        value: Value,
        rule: &Ruleset,
        conversion: &mut Conversion<'_>,
        parent: &str,
    ) -> Result<Value> {
        let options = Self::options(rule, conversion, parent)?;
        if options.contains(&value) {
            return Ok(value);
        }

        let listed = options
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Err(conversion.fatal(Error::Validation {
            field: value.to_string(),
            message: format!("{} is not one of the options [{}]", value, listed),
            expected: Some(listed),
            actual: Some(value.to_string()),
        }))
    }
}
