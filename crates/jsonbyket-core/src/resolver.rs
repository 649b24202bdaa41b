//! Variable resolution for scalar values
//!
//! Two forms are recognised in string values:
//!
//! - `$$name`, `$$.name`, `$$..name`: a back-reference to a variable bound by
//!   `varSet`. The leading dots select the ancestor where the search starts,
//!   relative to the node holding the property; the search then continues up
//!   to the root. Unknown names produce a warning and the literal is kept.
//! - `$kind args...`: a token handed to the variable type registered as `kind`.
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use crate::context::Conversion;
use crate::error::{Error, Result};
use crate::ruleset::{split_levels, Ruleset};
use serde_json::Value;

/// Prefix of scoped back-references
pub const BACK_REFERENCE: &str = "$$";

/// Prefix of variable type tokens
pub const VARIABLE_TOKEN: char = '$';

impl<'e> Conversion<'e> {
    /// Resolve variable references in `value`; containers and other scalars pass through
    pub fn resolve(&mut self, value: Value, parent: &str, rule: &Ruleset) -> Result<Value> {
        let Value::String(raw) = &value else {
            return Ok(value);
        };

        if let Some(reference) = raw.strip_prefix(BACK_REFERENCE) {
            let (levels, name) = split_levels(reference);
            let start = self.graph().ancestor(parent, levels)?.to_string();
            if let Some(found) = self.graph().lookup_variable(&start, name)? {
                return Ok(found.clone());
            }
            let message = format!("Variable \"{}\" does not exist! (searched from {})", name, start);
            self.warn(message);
            return Ok(value);
        }

        if let Some(token) = raw.strip_prefix(VARIABLE_TOKEN) {
            let kind = token.split_whitespace().next().unwrap_or_default();
            let engine = self.engine();
            let var_type = engine
                .var_type(kind)
                .ok_or_else(|| Error::schema(format!("No such varType \"{}\"", kind)))?;
            return var_type.value(rule, raw);
        }

        Ok(value)
    }
}
