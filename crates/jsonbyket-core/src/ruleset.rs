//! Compiled rule documents
//!
//! A rule document is compiled once into a [`Ruleset`] tree before any data
//! is converted. Each key of a `rules` mapping is parsed into a [`RuleKey`]:
//! comments (`//...`), global-setting directives (`@@path`), default-override
//! directives (`@path`, `@.path`, `@..path`, ...) and real properties. The
//! type declaration `t` is split into a bare type name and its transform chain
//! (`"number:round,abs"`).
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Prefix of per-index element rules in sequence rulesets (`rule#0`, `rule#1`, ...)
const INDEXED_RULE_PREFIX: &str = "rule#";

/// Split leading dots off a name, returning how many levels up it points
pub fn split_levels(raw: &str) -> (usize, &str) {
    let stripped = raw.trim_start_matches('.');
    (raw.len() - stripped.len(), stripped)
}

fn split_path(raw: &str) -> Vec<String> {
    raw.split('.')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Declared type of a ruleset plus the transforms appended through its `t` suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    /// Bare type name, e.g. `number`
    pub name: String,
    /// Transform names in application order
    pub transforms: Vec<String>,
}

impl TypeSpec {
    /// Parse `"<type>"` or `"<type>:<name1>,<name2>"`
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((name, transforms)) => Self {
                name: name.trim().to_string(),
                transforms: transforms
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect(),
            },
            None => Self {
                name: raw.trim().to_string(),
                transforms: Vec::new(),
            },
        }
    }

    /// A type without transforms
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transforms: Vec::new(),
        }
    }
}

/// Parsed meaning of a key inside a `rules` mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKey {
    /// `//...`, ignored
    Comment,
    /// `@@path`, sets a global setting
    GlobalSet(Vec<String>),
    /// `@` + dots + path, overrides a default on the node `levels` up
    DefaultOverride { levels: usize, path: Vec<String> },
    /// Anything else names a property of the data
    Property(String),
}

impl RuleKey {
    /// Classify a raw rule key
    pub fn parse(key: &str) -> Self {
        if key.starts_with("//") {
            RuleKey::Comment
        } else if let Some(path) = key.strip_prefix("@@") {
            RuleKey::GlobalSet(split_path(path))
        } else if let Some(rest) = key.strip_prefix('@') {
            let (levels, path) = split_levels(rest);
            RuleKey::DefaultOverride {
                levels,
                path: split_path(path),
            }
        } else {
            RuleKey::Property(key.to_string())
        }
    }
}

/// One compiled entry of a `rules` mapping, in document order
#[derive(Debug, Clone)]
pub enum RuleEntry {
    Comment,
    GlobalSet {
        path: Vec<String>,
        value: Value,
    },
    DefaultOverride {
        levels: usize,
        path: Vec<String>,
        value: Value,
    },
    Property {
        name: String,
        rule: Ruleset,
    },
}

/// Where a `varSet` directive binds its variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarTarget {
    /// Ancestor level relative to the node holding the property
    pub levels: usize,
    /// Variable name without the leading dots
    pub name: String,
}

/// The contract of a single property
#[derive(Debug, Clone, Default)]
pub struct Ruleset {
    raw: Map<String, Value>,
    type_spec: Option<TypeSpec>,
    entries: Vec<RuleEntry>,
    element: Option<Box<Ruleset>>,
    indexed: BTreeMap<usize, Ruleset>,
}

impl Ruleset {
    /// A ruleset with no entries at all (type `any`)
    pub fn empty() -> Self {
        Self::default()
    }

    /// A ruleset that only declares a type
    pub fn of_type(name: &str) -> Self {
        let mut raw = Map::new();
        raw.insert("t".to_string(), Value::String(name.to_string()));
        Self {
            raw,
            type_spec: Some(TypeSpec::bare(name)),
            ..Self::default()
        }
    }

    /// Compile the root of a rule document, `{"rules": {...}}`, as an object ruleset
    pub fn root(document: &Value) -> Result<Self> {
        let Value::Object(map) = document else {
            return Err(Error::schema("rule document must be an object"));
        };
        let mut map = map.clone();
        map.insert("t".to_string(), Value::String("object".to_string()));
        Self::compile_map(map, "root")
    }

    /// Compile a ruleset value
    pub fn compile(value: &Value) -> Result<Self> {
        Self::compile_named(value, "ruleset")
    }

    fn compile_named(value: &Value, name: &str) -> Result<Self> {
        match value {
            Value::Object(map) => Self::compile_map(map.clone(), name),
            other => Err(Error::schema(format!(
                "ruleset for \"{}\" must be an object, got {}",
                name, other
            ))),
        }
    }

    fn compile_map(raw: Map<String, Value>, name: &str) -> Result<Self> {
        let type_spec = match raw.get("t") {
            None => None,
            Some(Value::String(t)) => Some(TypeSpec::parse(t)),
            Some(other) => {
                return Err(Error::schema(format!(
                    "type of \"{}\" must be a string, got {}",
                    name, other
                )))
            }
        };

        let entries = match raw.get("rules") {
            None => Vec::new(),
            Some(Value::Object(rules)) => Self::compile_entries(rules)?,
            Some(other) => {
                return Err(Error::schema(format!(
                    "rules of \"{}\" must be an object, got {}",
                    name, other
                )))
            }
        };

        let element = match raw.get("rule") {
            Some(rule) => Some(Box::new(Self::compile_named(rule, name)?)),
            None => None,
        };

        let mut indexed = BTreeMap::new();
        for (key, rule) in &raw {
            if let Some(index) = key
                .strip_prefix(INDEXED_RULE_PREFIX)
                .and_then(|i| i.parse::<usize>().ok())
            {
                indexed.insert(index, Self::compile_named(rule, key)?);
            }
        }

        Ok(Self {
            raw,
            type_spec,
            entries,
            element,
            indexed,
        })
    }

    fn compile_entries(rules: &Map<String, Value>) -> Result<Vec<RuleEntry>> {
        rules
            .iter()
            .map(|(key, value)| {
                Ok(match RuleKey::parse(key) {
                    RuleKey::Comment => RuleEntry::Comment,
                    RuleKey::GlobalSet(path) | RuleKey::DefaultOverride { path, .. }
                        if path.is_empty() =>
                    {
                        return Err(Error::schema(format!(
                            "directive \"{}\" does not name a setting",
                            key
                        )))
                    }
                    RuleKey::GlobalSet(path) => RuleEntry::GlobalSet {
                        path,
                        value: value.clone(),
                    },
                    RuleKey::DefaultOverride { levels, path } => RuleEntry::DefaultOverride {
                        levels,
                        path,
                        value: value.clone(),
                    },
                    RuleKey::Property(name) => {
                        let rule = Self::compile_named(value, &name)?;
                        RuleEntry::Property { name, rule }
                    }
                })
            })
            .collect()
    }

    /// Parsed `t`, if declared
    pub fn type_spec(&self) -> Option<&TypeSpec> {
        self.type_spec.as_ref()
    }

    /// Bare declared type name, if declared
    pub fn type_name(&self) -> Option<&str> {
        self.type_spec.as_ref().map(|t| t.name.as_str())
    }

    /// Transform chain from the `t` suffix
    pub fn transforms(&self) -> &[String] {
        self.type_spec
            .as_ref()
            .map(|t| t.transforms.as_slice())
            .unwrap_or(&[])
    }

    /// Compiled entries of `rules`, in document order
    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    /// Uniform element rule (`rule`)
    pub fn element_rule(&self) -> Option<&Ruleset> {
        self.element.as_deref()
    }

    /// Per-index element rule (`rule#<index>`)
    pub fn index_rule(&self, index: usize) -> Option<&Ruleset> {
        self.indexed.get(&index)
    }

    /// Raw entry lookup, for plugins reading custom keys
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// Whether the raw entry exists
    pub fn contains(&self, key: &str) -> bool {
        self.raw.contains_key(key)
    }

    /// Parsed `varSet` directive
    pub fn var_set(&self) -> Option<VarTarget> {
        let raw = self.raw.get("varSet")?.as_str()?;
        let (levels, name) = split_levels(raw);
        Some(VarTarget {
            levels,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_spec_parse() {
        assert_eq!(TypeSpec::parse("number"), TypeSpec::bare("number"));
        assert_eq!(
            TypeSpec::parse("string:trim,upper"),
            TypeSpec {
                name: "string".into(),
                transforms: vec!["trim".into(), "upper".into()],
            }
        );
        assert_eq!(TypeSpec::parse("string:").transforms, Vec::<String>::new());
    }

    #[test]
    fn test_rule_key_parse() {
        assert_eq!(RuleKey::parse("// note"), RuleKey::Comment);
        assert_eq!(
            RuleKey::parse("@@removeHidden"),
            RuleKey::GlobalSet(vec!["removeHidden".into()])
        );
        assert_eq!(
            RuleKey::parse("@r"),
            RuleKey::DefaultOverride {
                levels: 0,
                path: vec!["r".into()]
            }
        );
        assert_eq!(
            RuleKey::parse("@..unit.time"),
            RuleKey::DefaultOverride {
                levels: 2,
                path: vec!["unit".into(), "time".into()]
            }
        );
        assert_eq!(RuleKey::parse("name"), RuleKey::Property("name".into()));
    }

    #[test]
    fn test_split_levels() {
        assert_eq!(split_levels("n"), (0, "n"));
        assert_eq!(split_levels("..n"), (2, "n"));
    }

    #[test]
    fn test_compile_preserves_entry_order() {
        let rules = Ruleset::root(&json!({
            "rules": {
                "// comment": "ignored",
                "@autoAdd": false,
                "b": {"t": "number"},
                "a": {"t": "string:upper"}
            }
        }))
        .unwrap();

        assert_eq!(rules.type_name(), Some("object"));
        let kinds: Vec<String> = rules
            .entries()
            .iter()
            .map(|entry| match entry {
                RuleEntry::Comment => "comment".to_string(),
                RuleEntry::GlobalSet { .. } => "global".to_string(),
                RuleEntry::DefaultOverride { .. } => "override".to_string(),
                RuleEntry::Property { name, .. } => name.clone(),
            })
            .collect();
        assert_eq!(kinds, vec!["comment", "override", "b", "a"]);

        match &rules.entries()[3] {
            RuleEntry::Property { rule, .. } => assert_eq!(rule.transforms(), ["upper"]),
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_compile_sequence_rules() {
        let rule = Ruleset::compile(&json!({
            "t": "array",
            "rule": {"t": "string"},
            "rule#1": {"t": "number"}
        }))
        .unwrap();

        assert_eq!(rule.element_rule().and_then(Ruleset::type_name), Some("string"));
        assert_eq!(rule.index_rule(1).and_then(Ruleset::type_name), Some("number"));
        assert!(rule.index_rule(0).is_none());
    }

    #[test]
    fn test_compile_rejects_malformed_rules() {
        assert!(Ruleset::root(&json!({"rules": {"x": 5}})).is_err());
        assert!(Ruleset::root(&json!({"rules": []})).is_err());
        assert!(Ruleset::compile(&json!({"t": 3})).is_err());
        assert!(Ruleset::root(&json!({"rules": {"@": 1}})).is_err());
        assert!(Ruleset::root(&json!("rules")).is_err());
    }

    #[test]
    fn test_var_set_target() {
        let rule = Ruleset::compile(&json!({"varSet": "..total"})).unwrap();
        assert_eq!(
            rule.var_set(),
            Some(VarTarget {
                levels: 2,
                name: "total".into()
            })
        );
    }
}
