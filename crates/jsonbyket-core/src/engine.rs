//! The conversion engine
//!
//! An [`Engine`] holds the plugin registries and the configuration every
//! conversion starts from. Registries are filled at construction and by the
//! `add_*` methods; a conversion only looks names up. Each call to
//! [`Engine::convert`] runs a fresh [`Conversion`], so no state carries over
//! between calls.
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use crate::context::{Conversion, ConversionReport};
use crate::datatypes::{self, DataType};
use crate::error::{Error, Result};
use crate::ruleset::Ruleset;
use crate::settings::{Defaults, EngineConfig, Globals};
use crate::transformer::{built_in, Transform};
use crate::vartypes::{self, VariableType};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Plugin registries plus the starting configuration of every conversion
pub struct Engine {
    data_types: HashMap<String, Box<dyn DataType>>,
    var_types: HashMap<String, Box<dyn VariableType>>,
    transforms: HashMap<String, Transform>,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("data_types", &self.data_type_names())
            .field("var_types", &self.var_type_names())
            .field("transforms", &self.transform_names())
            .field("config", &self.config)
            .finish()
    }
}

impl Engine {
    /// An engine with all built-in data types, variable types and transforms
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// A built-in engine starting from `config`
    pub fn with_config(config: EngineConfig) -> Self {
        let mut engine = Self::bare();
        engine.config = config;
        for data_type in datatypes::built_in() {
            engine.insert_data_type(data_type);
        }
        for var_type in vartypes::built_in() {
            engine.insert_var_type(var_type);
        }
        for transform in built_in::all() {
            engine.insert_transform(transform);
        }
        engine
    }

    /// An engine with empty registries
    pub fn bare() -> Self {
        Self {
            data_types: HashMap::new(),
            var_types: HashMap::new(),
            transforms: HashMap::new(),
            config: EngineConfig::default(),
        }
    }

    /// Starting configuration of conversions
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    /// Globals every conversion starts with
    pub fn globals_mut(&mut self) -> &mut Globals {
        &mut self.config.globals
    }

    /// Replace the default overrides merged over the built-in defaults
    pub fn set_defaults(&mut self, defaults: Defaults) -> &mut Self {
        self.config.defaults = Some(defaults);
        self
    }

    /// Register a data type under its own name, replacing any previous one
    pub fn add_data_type(&mut self, data_type: impl DataType + 'static) -> &mut Self {
        self.insert_data_type(Box::new(data_type));
        self
    }

    /// Register a variable type under its own name, replacing any previous one
    pub fn add_var_type(&mut self, var_type: impl VariableType + 'static) -> &mut Self {
        self.insert_var_type(Box::new(var_type));
        self
    }

    /// Register a transform.
    ///
    /// Without an explicit `name` the function item's own name is used.
    pub fn add_transform<F>(&mut self, function: F, name: Option<&str>) -> &mut Self
    where
        F: Fn(Value, &Ruleset, &Conversion<'_>, &str) -> Result<Value> + Send + Sync + 'static,
    {
        let transform = match name {
            Some(name) => Transform::new(name, function),
            None => Transform::from_fn(function),
        };
        self.insert_transform(transform);
        self
    }

    fn insert_data_type(&mut self, data_type: Box<dyn DataType>) {
        tracing::trace!(name = data_type.name(), "registering data type");
        self.data_types.insert(data_type.name().to_string(), data_type);
    }

    fn insert_var_type(&mut self, var_type: Box<dyn VariableType>) {
        tracing::trace!(name = var_type.name(), "registering variable type");
        self.var_types.insert(var_type.name().to_string(), var_type);
    }

    fn insert_transform(&mut self, transform: Transform) {
        tracing::trace!(name = transform.name(), "registering transform");
        self.transforms.insert(transform.name().to_string(), transform);
    }

    pub fn data_type(&self, name: &str) -> Option<&dyn DataType> {
        self.data_types.get(name).map(|t| t.as_ref())
    }

    pub fn var_type(&self, name: &str) -> Option<&dyn VariableType> {
        self.var_types.get(name).map(|t| t.as_ref())
    }

    pub fn transform(&self, name: &str) -> Option<&Transform> {
        self.transforms.get(name)
    }

    /// Registered data type names, sorted
    pub fn data_type_names(&self) -> Vec<&str> {
        sorted_keys(&self.data_types)
    }

    /// Registered variable type names, sorted
    pub fn var_type_names(&self) -> Vec<&str> {
        sorted_keys(&self.var_types)
    }

    /// Registered transform names, sorted
    pub fn transform_names(&self) -> Vec<&str> {
        sorted_keys(&self.transforms)
    }

    /// Convert `data` against a rule document of the form `{"rules": {...}}`
    pub fn convert(&self, data: Value, rules: &Value) -> Result<Value> {
        self.convert_with_report(data, rules).map(|(value, _)| value)
    }

    /// Like [`convert`](Self::convert), also returning node count and warnings
    pub fn convert_with_report(
        &self,
        data: Value,
        rules: &Value,
    ) -> Result<(Value, ConversionReport)> {
        let root = Ruleset::root(rules)?;
        tracing::debug!(entries = root.entries().len(), "starting conversion");
        let (value, report) = Conversion::new(self).run(data, &root)?;
        tracing::debug!(
            nodes = report.nodes,
            warnings = report.warnings.len(),
            "conversion finished"
        );
        Ok((value, report))
    }

    /// Parse two JSON documents and convert
    pub fn loads(&self, data: &str, rules: &str) -> Result<Value> {
        let data = parse_document(data, "data")?;
        let rules = parse_document(rules, "rules")?;
        self.convert(data, &rules)
    }

    /// Read two JSON files and convert
    pub fn load(&self, data_path: impl AsRef<Path>, rules_path: impl AsRef<Path>) -> Result<Value> {
        let data = read_document(data_path.as_ref())?;
        let rules = read_document(rules_path.as_ref())?;
        self.loads(&data, &rules)
    }
}

fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<&str> {
    let mut names: Vec<&str> = map.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}

fn parse_document(text: &str, what: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| Error::Json {
        message: format!("Failed to parse {} document", what),
        source: e,
    })
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::Io {
        message: format!("Could not find file {}", path.display()),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_built_in_registries() {
        let engine = Engine::new();
        assert_eq!(
            engine.data_type_names(),
            vec![
                "any",
                "array",
                "bool",
                "boolean",
                "choice",
                "distance",
                "keyvaluepair",
                "number",
                "object",
                "string",
                "time"
            ]
        );
        assert_eq!(engine.var_type_names(), vec!["env", "rand"]);
        assert!(engine.transform("unique").is_some());
    }

    #[test]
    fn test_bare_engine_is_empty() {
        let engine = Engine::bare();
        assert!(engine.data_type_names().is_empty());
        assert!(engine.transform("lower").is_none());
    }

    #[test]
    fn test_add_transform_default_and_explicit_name() {
        fn shout(value: Value, _: &Ruleset, _: &Conversion<'_>, _: &str) -> Result<Value> {
            Ok(value)
        }

        let mut engine = Engine::bare();
        engine.add_transform(shout, None).add_transform(shout, Some("yell"));

        assert_eq!(engine.transform_names(), vec!["shout", "yell"]);
    }

    #[test]
    fn test_loads_reports_parse_errors() {
        let engine = Engine::new();
        let err = engine.loads("{not json", "{}").unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }

    #[test]
    fn test_convert_requires_object_rule_document() {
        let engine = Engine::new();
        let err = engine.convert(json!({}), &json!(["rules"])).unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
    }
}
