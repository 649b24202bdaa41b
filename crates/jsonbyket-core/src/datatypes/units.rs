//! Unit data types: `distance` and `time`
//!
//! Values are numbers or strings such as `"2.5km"` / `"90 min"`. They are
//! converted into the unit named by the rule's `unit` entry, falling back to
//! the node defaults' `unit.<kind>`, and then run through the numeric
//! constraint pipeline.
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use super::numeric::NumericConstraints;
use super::DataType;
use crate::context::Conversion;
use crate::error::{Error, Result};
use crate::ruleset::Ruleset;
use crate::value::kind_name;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Unit names and their size in the base unit of the family
type UnitTable = &'static [(&'static str, f64)];

const DISTANCE_UNITS: UnitTable = &[
    ("mm", 0.001),
    ("cm", 0.01),
    ("m", 1.0),
    ("km", 1000.0),
    ("in", 0.0254),
    ("ft", 0.3048),
    ("yd", 0.9144),
    ("mi", 1609.344),
];

const TIME_UNITS: UnitTable = &[
    ("ms", 0.001),
    ("s", 1.0),
    ("min", 60.0),
    ("h", 3600.0),
    ("d", 86400.0),
];

/// `<number><unit>` with optional surrounding whitespace
static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*([A-Za-z]*)\s*$")
        .expect("quantity pattern compiles")
});

/// A parsed quantity; `unit` is `None` when the input carried no suffix
#[derive(Debug, Clone, PartialEq)]
struct Quantity {
    amount: f64,
    unit: Option<String>,
}

fn parse_quantity(value: &Value) -> Option<Quantity> {
    match value {
        Value::Number(n) => n.as_f64().map(|amount| Quantity { amount, unit: None }),
        Value::String(s) => {
            let captures = QUANTITY_RE.captures(s)?;
            let amount = captures.get(1)?.as_str().parse::<f64>().ok()?;
            if !amount.is_finite() {
                return None;
            }
            let unit = captures
                .get(2)
                .map(|m| m.as_str())
                .filter(|u| !u.is_empty())
                .map(str::to_string);
            Some(Quantity { amount, unit })
        }
        _ => None,
    }
}

/// A physical quantity family with a fixed unit table
pub struct UnitType {
    name: &'static str,
    kind: &'static str,
    base: &'static str,
    table: UnitTable,
}

impl UnitType {
    /// `distance`, base unit metres
    pub fn distance() -> Self {
        Self {
            name: "distance",
            kind: "distance",
            base: "m",
            table: DISTANCE_UNITS,
        }
    }

    /// `time`, base unit seconds
    pub fn time() -> Self {
        Self {
            name: "time",
            kind: "time",
            base: "s",
            table: TIME_UNITS,
        }
    }

    fn factor(&self, unit: &str) -> Option<f64> {
        self.table
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, factor)| *factor)
    }

    fn target_unit(
        &self,
        rule: &Ruleset,
        conversion: &mut Conversion<'_>,
        parent: &str,
    ) -> Result<String> {
        match conversion.rule_value(rule, "unit", parent)? {
            Some(Value::String(unit)) => Ok(unit),
            Some(other) => Err(Error::schema(format!(
                "unit of a {} rule must be a string, got {}",
                self.name, other
            ))),
            None => Ok(conversion
                .defaults(parent)?
                .unit(self.kind)
                .unwrap_or(self.base)
                .to_string()),
        }
    }
}

impl DataType for UnitType {
    fn name(&self) -> &str {
        self.name
    }

    fn default_value(&self) -> Value {
        Value::from(0)
    }

    fn matches(&self, value: &Value) -> bool {
        parse_quantity(value).is_some()
    }

    fn convert(
        &self,
        value: Value,
        rule: &Ruleset,
        conversion: &mut Conversion<'_>,
        parent: &str,
    ) -> Result<Value> {
        let quantity = parse_quantity(&value)
            .ok_or_else(|| Error::type_mismatch(value.to_string(), self.name, kind_name(&value)))?;

        let target = self.target_unit(rule, conversion, parent)?;
        let target_factor = self.factor(&target).ok_or_else(|| {
            Error::schema(format!("Unknown {} unit \"{}\" in rules", self.kind, target))
        })?;

        let source_factor = match &quantity.unit {
            None => target_factor,
            Some(unit) => match self.factor(unit) {
                Some(factor) => factor,
                None => {
                    return Err(conversion.fatal(Error::validation(
                        value.to_string(),
                        format!("Unknown {} unit \"{}\"", self.kind, unit),
                    )))
                }
            },
        };

        let amount = quantity.amount * source_factor / target_factor;
        let constraints = NumericConstraints::from_rule(rule, conversion, parent)?;
        Ok(constraints.apply_to_json(amount))
    }
}
