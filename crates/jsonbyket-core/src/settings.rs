//! Engine-wide settings: global switches and inherited default settings
//!
//! Globals are changed for the duration of one conversion by `@@` rule
//! directives; defaults are snapshotted per node and changed for a subtree
//! by `@` directives.
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::value::{merge_into, set_path, truthy};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Global switches of a conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Globals {
    /// Log threshold; messages below this level are suppressed (0 = most verbose)
    pub logging: i64,

    /// Return fatal errors to the caller instead of terminating the process
    pub traceback_logging: bool,

    /// Strip `_uid`, `_parent`, `_variables` and `_defaults` from the output
    pub remove_hidden: bool,

    /// Settings the engine does not interpret itself
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Globals {
    fn default() -> Self {
        Self {
            logging: 4,
            traceback_logging: false,
            remove_hidden: true,
            extra: Map::new(),
        }
    }
}

impl Globals {
    /// Set a (possibly dotted) key path, merging object values.
    ///
    /// Fails if the result no longer fits the typed fields, e.g. `logging = "loud"`.
    pub fn set(&mut self, path: &[String], value: Value) -> Result<()> {
        let mut raw = match serde_json::to_value(&*self) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(Error::settings("globals did not serialize to an object")),
            Err(e) => return Err(Error::settings(e.to_string())),
        };
        set_path(&mut raw, path, value);

        *self = serde_json::from_value(Value::Object(raw)).map_err(|e| {
            Error::settings(format!("cannot set global \"{}\": {}", path.join("."), e))
        })?;
        Ok(())
    }
}

/// Inherited fallback settings of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Defaults(Map<String, Value>);

impl Default for Defaults {
    fn default() -> Self {
        let value = json!({
            "unit": {"time": "s", "distance": "m"},
            "autoAdd": true,
            "t": "string",
            "r": false,
            "options": ["yes", "no"]
        });
        match value {
            Value::Object(map) => Self(map),
            _ => Self(Map::new()),
        }
    }
}

impl Defaults {
    /// Wrap an existing map
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Raw access to an entry
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a key path with merge semantics
    pub fn set(&mut self, path: &[String], value: Value) {
        set_path(&mut self.0, path, value);
    }

    /// Merge another defaults map over this one
    pub fn merge(&mut self, other: Defaults) {
        merge_into(&mut self.0, other.0);
    }

    /// Default for the `r` (required) flag
    pub fn required(&self) -> bool {
        self.0.get("r").map(truthy).unwrap_or(false)
    }

    /// Default for the `autoAdd` flag
    pub fn auto_add(&self) -> bool {
        self.0.get("autoAdd").map(truthy).unwrap_or(true)
    }

    /// Declared type used when a ruleset has no `t`
    pub fn declared_type(&self) -> &str {
        self.0.get("t").and_then(Value::as_str).unwrap_or("string")
    }

    /// Default unit for a unit family such as `time` or `distance`
    pub fn unit(&self, kind: &str) -> Option<&str> {
        self.0.get("unit")?.get(kind)?.as_str()
    }

    /// Default option list for `choice` properties
    pub fn options(&self) -> Option<&Vec<Value>> {
        self.0.get("options")?.as_array()
    }

    /// The underlying map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Settings an [`Engine`](crate::Engine) starts every conversion with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Global switches
    pub globals: Globals,

    /// Overrides merged over the built-in defaults
    pub defaults: Option<Defaults>,
}

impl EngineConfig {
    /// Defaults a conversion starts from: built-ins with configured overrides merged on top
    pub fn effective_defaults(&self) -> Defaults {
        let mut defaults = Defaults::default();
        if let Some(overrides) = &self.defaults {
            defaults.merge(overrides.clone());
        }
        defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_globals_defaults() {
        let globals = Globals::default();
        assert_eq!(globals.logging, 4);
        assert!(!globals.traceback_logging);
        assert!(globals.remove_hidden);
    }

    #[test]
    fn test_globals_set_known_and_unknown_keys() {
        let mut globals = Globals::default();
        globals.set(&["removeHidden".into()], json!(false)).unwrap();
        globals.set(&["theme".into()], json!("dark")).unwrap();

        assert!(!globals.remove_hidden);
        assert_eq!(globals.extra["theme"], json!("dark"));
    }

    #[test]
    fn test_globals_set_type_mismatch() {
        let mut globals = Globals::default();
        let err = globals.set(&["logging".into()], json!("loud")).unwrap_err();
        assert!(matches!(err, Error::Settings { .. }));
        assert_eq!(globals.logging, 4);
    }

    #[test]
    fn test_defaults_accessors() {
        let mut defaults = Defaults::default();
        assert!(!defaults.required());
        assert!(defaults.auto_add());
        assert_eq!(defaults.declared_type(), "string");
        assert_eq!(defaults.unit("time"), Some("s"));

        defaults.set(&["unit".into()], json!({"time": "ms"}));
        assert_eq!(defaults.unit("time"), Some("ms"));
        assert_eq!(defaults.unit("distance"), Some("m"));
    }

    #[test]
    fn test_defaults_flags_follow_truthiness() {
        let mut defaults = Defaults::default();
        defaults.set(&["r".into()], json!(1));
        defaults.set(&["autoAdd".into()], json!(0));
        assert!(defaults.required());
        assert!(!defaults.auto_add());

        defaults.set(&["r".into()], json!(""));
        defaults.set(&["autoAdd".into()], json!("yes"));
        assert!(!defaults.required());
        assert!(defaults.auto_add());
    }

    #[test]
    fn test_engine_config_from_yaml_like_json() {
        let config: EngineConfig = serde_json::from_value(json!({
            "globals": {"removeHidden": false},
            "defaults": {"r": true}
        }))
        .unwrap();

        assert!(!config.globals.remove_hidden);
        assert_eq!(config.globals.logging, 4);
        assert!(config.effective_defaults().required());
        assert_eq!(config.effective_defaults().declared_type(), "string");
    }
}
