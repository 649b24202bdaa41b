//! Transform records
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use crate::context::Conversion;
use crate::error::Result;
use crate::ruleset::Ruleset;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Signature of a transform: `(value, rule, conversion, parent_uid) -> value`
pub type TransformFn =
    dyn Fn(Value, &Ruleset, &Conversion<'_>, &str) -> Result<Value> + Send + Sync;

/// A named transform held by the engine's registry
#[derive(Clone)]
pub struct Transform {
    name: String,
    function: Arc<TransformFn>,
}

impl Transform {
    /// Wrap a function under an explicit name
    pub fn new<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(Value, &Ruleset, &Conversion<'_>, &str) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            function: Arc::new(function),
        }
    }

    /// Wrap a function, naming it after the function item itself
    pub fn from_fn<F>(function: F) -> Self
    where
        F: Fn(Value, &Ruleset, &Conversion<'_>, &str) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(function_name::<F>(), function)
    }

    /// Registered name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the transform
    pub fn apply(
        &self,
        value: Value,
        rule: &Ruleset,
        conversion: &Conversion<'_>,
        parent: &str,
    ) -> Result<Value> {
        (self.function)(value, rule, conversion, parent)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform").field("name", &self.name).finish()
    }
}

/// Last path segment of a function's type name, `my_crate::fixes::strip` -> `strip`.
///
/// Closures have no usable name and come out as `{{closure}}`.
pub(crate) fn function_name<F>() -> String {
    let full = std::any::type_name::<F>();
    full.rsplit("::").next().unwrap_or(full).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shout(value: Value, _: &Ruleset, _: &Conversion<'_>, _: &str) -> Result<Value> {
        Ok(value)
    }

    #[test]
    fn test_name_taken_from_function_item() {
        let transform = Transform::from_fn(shout);
        assert_eq!(transform.name(), "shout");
        assert_eq!(format!("{:?}", transform), "Transform { name: \"shout\" }");
    }

    #[test]
    fn test_explicit_name() {
        let transform = Transform::new("loud", shout);
        assert_eq!(transform.name(), "loud");
    }
}
