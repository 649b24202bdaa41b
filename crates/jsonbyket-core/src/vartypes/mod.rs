//! Variable type plugins
//!
//! A scalar string of the form `$<kind> <args...>` is handed to the variable
//! type registered under `<kind>`, which produces the value that replaces it.
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::ruleset::Ruleset;
use anyhow::{anyhow, Context};
use rand::Rng;
use serde_json::Value;

/// Capability of a variable type plugin
pub trait VariableType: Send + Sync {
    /// Name used after the `$`
    fn name(&self) -> &str;

    /// Produce the value for the raw token, e.g. `"$env HOME"`
    fn value(&self, rule: &Ruleset, raw: &str) -> Result<Value>;
}

/// Arguments following the `$<kind>` head of a token
fn arguments(raw: &str) -> Vec<&str> {
    raw.split_whitespace().skip(1).collect()
}

/// `$env NAME [fallback]`: a process environment variable
pub struct EnvVar;

impl VariableType for EnvVar {
    fn name(&self) -> &str {
        "env"
    }

    fn value(&self, _rule: &Ruleset, raw: &str) -> Result<Value> {
        let args = arguments(raw);
        let Some(name) = args.first() else {
            return Err(Error::plugin(
                self.name(),
                anyhow!("expected `$env NAME [fallback]`, got {:?}", raw),
            ));
        };

        match std::env::var(name) {
            Ok(value) => Ok(Value::String(value)),
            Err(_) if args.len() > 1 => Ok(Value::String(args[1..].join(" "))),
            Err(e) => Err(Error::plugin(
                self.name(),
                anyhow::Error::new(e).context(format!("environment variable {} is not set", name)),
            )),
        }
    }
}

/// `$rand LOW HIGH`: a uniform integer in `[LOW, HIGH]`
pub struct RandVar;

impl RandVar {
    fn bounds(raw: &str) -> anyhow::Result<(i64, i64)> {
        let args = arguments(raw);
        if args.len() != 2 {
            return Err(anyhow!("expected `$rand LOW HIGH`, got {:?}", raw));
        }
        let low = args[0]
            .parse::<i64>()
            .with_context(|| format!("invalid lower bound {:?}", args[0]))?;
        let high = args[1]
            .parse::<i64>()
            .with_context(|| format!("invalid upper bound {:?}", args[1]))?;
        if low > high {
            return Err(anyhow!("empty range {}..={}", low, high));
        }
        Ok((low, high))
    }
}

impl VariableType for RandVar {
    fn name(&self) -> &str {
        "rand"
    }

    fn value(&self, _rule: &Ruleset, raw: &str) -> Result<Value> {
        let (low, high) = Self::bounds(raw).map_err(|e| Error::plugin(self.name(), e))?;
        Ok(Value::from(rand::thread_rng().gen_range(low..=high)))
    }
}

/// The variable types every [`Engine`](crate::Engine) starts with
pub fn built_in() -> Vec<Box<dyn VariableType>> {
    vec![Box::new(EnvVar), Box::new(RandVar)]
}
