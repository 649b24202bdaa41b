//! Transform chain application
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use crate::context::Conversion;
use crate::error::{Error, Result};
use crate::ruleset::Ruleset;
use serde_json::Value;

/// Apply `transforms` to `value` in order, each consuming the previous result.
///
/// An unregistered name fails the whole chain with a schema error.
pub fn apply(
    conversion: &Conversion<'_>,
    value: Value,
    rule: &Ruleset,
    transforms: &[String],
    parent: &str,
) -> Result<Value> {
    let engine = conversion.engine();
    transforms.iter().try_fold(value, |value, name| {
        let transform = engine.transform(name).ok_or_else(|| {
            Error::schema(format!(
                "Transform \"{}\" does not exist or was never added.",
                name
            ))
        })?;
        conversion.log(1, &format!("applying transform {} under {}", name, parent));
        transform.apply(value, rule, conversion, parent)
    })
}
