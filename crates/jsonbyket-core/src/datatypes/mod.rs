//! Data type plugins
//!
//! A data type is registered under a name and referenced from rulesets via
//! `t`. The dispatcher first checks [`DataType::matches`] and then hands the
//! value to [`DataType::convert`].
//!
//! # Module Organization
//!
//! - [`basics`] - `any`, `string`, `number`, `bool`
//! - [`collections`] - `array`, `object`, `keyvaluepair`
//! - [`units`] - `distance`, `time`
//! - [`choice`] - `choice`
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use crate::context::Conversion;
use crate::error::Result;
use crate::ruleset::Ruleset;
use serde_json::Value;

pub mod basics;
pub mod choice;
pub mod collections;
pub mod numeric;
pub mod units;


pub use basics::{AnyType, BoolType, NumberType, StringType};
pub use choice::ChoiceType;
pub use collections::{ArrayType, KeyValueType, ObjectType};
pub use units::UnitType;

/// Capability set of a data type plugin
pub trait DataType: Send + Sync {
    /// Name the type is registered and referenced under
    fn name(&self) -> &str;

    /// Value synthesized for a missing property without an explicit default
    fn default_value(&self) -> Value;

    /// Whether `value` is acceptable input for this type
    fn matches(&self, value: &Value) -> bool;

    /// Convert a matching value.
    ///
    /// `parent` is the UID of the node holding the property.
    fn convert(
        &self,
        value: Value,
        rule: &Ruleset,
        conversion: &mut Conversion<'_>,
        parent: &str,
    ) -> Result<Value>;

    /// Whether mapping values of this type become nodes of the object graph
    fn registers_nodes(&self) -> bool {
        true
    }

    /// Whether this type holds a sequence, so a list default is a literal and not candidates
    fn is_sequence(&self) -> bool {
        false
    }
}

/// The data types every [`Engine`](crate::Engine) starts with
pub fn built_in() -> Vec<Box<dyn DataType>> {
    vec![
        Box::new(AnyType),
        Box::new(ArrayType),
        Box::new(ObjectType),
        Box::new(UnitType::distance()),
        Box::new(StringType),
        Box::new(NumberType),
        Box::new(BoolType::new("bool")),
        Box::new(BoolType::new("boolean")),
        Box::new(UnitType::time()),
        Box::new(ChoiceType),
        Box::new(KeyValueType),
    ]
}
