//! Rule interpreter: converts an object node against the entries of its `rules`
//!
//! Entries are processed in document order. Directives change settings for
//! everything converted after them; properties are checked for presence,
//! synthesized from defaults, bound to variables and converted recursively.
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use crate::context::{strip_inline_comment, Conversion};
use crate::error::{Error, Result};
use crate::ruleset::{RuleEntry, Ruleset, TypeSpec};
use crate::value::{truthy, DEFAULTS_KEY, PARENT_KEY, UID_KEY, VARIABLES_KEY};
use serde_json::{Map, Value};

/// Convert an object node.
///
/// `data` normally carries the `_uid` stamped by the dispatcher; a map without
/// one is registered as a fresh node under `parent`.
pub fn convert_object(
    conversion: &mut Conversion<'_>,
    mut data: Map<String, Value>,
    rule: &Ruleset,
    parent: &str,
) -> Result<Value> {
    let uid = match data.get(UID_KEY).and_then(Value::as_str) {
        Some(uid) if conversion.graph().contains(uid) => uid.to_string(),
        _ => {
            let uid = conversion.graph_mut().generate_uid();
            data.insert(UID_KEY.to_string(), Value::String(uid.clone()));
            data.insert(PARENT_KEY.to_string(), Value::String(parent.to_string()));
            conversion.graph_mut().register(&uid, parent, data.clone())?;
            uid
        }
    };
    conversion.graph_mut().inherit_defaults(&uid)?;

    for entry in rule.entries() {
        match entry {
            RuleEntry::Comment => {}
            RuleEntry::GlobalSet { path, value } => {
                conversion.log(1, &format!("setting global {}", path.join(".")));
                conversion.globals_mut().set(path, value.clone())?;
            }
            RuleEntry::DefaultOverride {
                levels,
                path,
                value,
            } => {
                let target = conversion.graph().ancestor(&uid, *levels)?.to_string();
                conversion.log(
                    1,
                    &format!("overriding default {} on node {}", path.join("."), target),
                );
                conversion
                    .graph_mut()
                    .node_mut(&target)?
                    .defaults
                    .set(path, value.clone());
            }
            RuleEntry::Property {
                name,
                rule: property,
            } => convert_property(conversion, &mut data, &uid, name, property)?,
        }
    }

    let node = conversion.graph().node(&uid)?;
    data.insert(DEFAULTS_KEY.to_string(), node.defaults.to_value());
    data.insert(
        VARIABLES_KEY.to_string(),
        Value::Object(node.variables.clone()),
    );
    conversion.graph_mut().update_payload(&uid, data.clone())?;
    Ok(Value::Object(data))
}

fn convert_property(
    conversion: &mut Conversion<'_>,
    data: &mut Map<String, Value>,
    uid: &str,
    name: &str,
    rule: &Ruleset,
) -> Result<()> {
    let mut type_spec = rule.type_spec().cloned();
    let mut synthesized = false;

    if !data.contains_key(name) {
        let required = match conversion.rule_value(rule, "r", uid)? {
            Some(flag) => truthy(&flag),
            None => conversion.defaults(uid)?.required(),
        };
        if required {
            return Err(conversion.fatal(Error::validation(
                name,
                format!(
                    "Property with key \"{}\" was not found in the config file.",
                    name
                ),
            )));
        }

        let auto_add = match conversion.rule_value(rule, "autoAdd", uid)? {
            Some(flag) => truthy(&flag),
            None => conversion.defaults(uid)?.auto_add(),
        };
        if !auto_add {
            return Ok(());
        }

        match default_value(conversion, rule, uid)? {
            Some((value, declared)) => {
                data.insert(name.to_string(), value);
                type_spec.get_or_insert(declared);
            }
            None => return Ok(()),
        }
        synthesized = true;
    }

    if let Some(target) = rule.var_set() {
        let scope = conversion.graph().ancestor(uid, target.levels)?.to_string();
        let raw = data.get(name).cloned().unwrap_or(Value::Null);
        conversion.log(
            -1,
            &format!("Setting variable {} on node {}", target.name, scope),
        );
        conversion
            .graph_mut()
            .bind_variable(&scope, &target.name, raw)?;
    }

    let value = data
        .get_mut(name)
        .map(std::mem::take)
        .unwrap_or(Value::Null);
    let type_spec = type_spec.unwrap_or_else(|| TypeSpec::bare("any"));
    let converted = if synthesized {
        conversion.dispatch_resolved(value, rule, &type_spec, uid, name, None)?
    } else {
        conversion.dispatch(value, rule, &type_spec, uid, name, None)?
    };
    data.insert(name.to_string(), converted);
    Ok(())
}

/// Resolve the default of a property held by node `uid`.
///
/// Returns the value together with the declared type it was resolved for
/// (the ruleset's own `t`, else the node's default type). `None` means a
/// candidate list had no entry matching the declared type.
pub fn default_value(
    conversion: &mut Conversion<'_>,
    rule: &Ruleset,
    uid: &str,
) -> Result<Option<(Value, TypeSpec)>> {
    let declared = match rule.type_spec() {
        Some(spec) => spec.clone(),
        None => TypeSpec::bare(conversion.defaults(uid)?.declared_type()),
    };
    let engine = conversion.engine();
    let data_type = engine
        .data_type(&declared.name)
        .ok_or_else(|| Error::schema(format!("Invalid DataType \"{}\"", declared.name)))?;

    let Some(default) = rule.get("d").cloned() else {
        return Ok(Some((data_type.default_value(), declared)));
    };

    match conversion.resolve(strip_inline_comment(default), uid, rule)? {
        Value::Array(candidates) if !data_type.is_sequence() => {
            for candidate in candidates {
                let candidate = conversion.resolve(strip_inline_comment(candidate), uid, rule)?;
                if data_type.matches(&candidate) {
                    return Ok(Some((candidate, declared)));
                }
            }
            Ok(None)
        }
        other => Ok(Some((other, declared))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ROOT_UID;
    use crate::Engine;
    use serde_json::json;

    fn engine() -> Engine {
        let mut engine = Engine::new();
        engine.globals_mut().traceback_logging = true;
        engine
    }

    fn compile(value: Value) -> Ruleset {
        Ruleset::compile(&value).unwrap()
    }

    #[test]
    fn test_default_falls_back_to_type_default() {
        let engine = engine();
        let mut conversion = Conversion::new(&engine);

        let (value, declared) = default_value(&mut conversion, &compile(json!({"t": "number"})), ROOT_UID)
            .unwrap()
            .unwrap();
        assert_eq!(value, json!(0));
        assert_eq!(declared.name, "number");

        let (value, declared) = default_value(&mut conversion, &compile(json!({})), ROOT_UID)
            .unwrap()
            .unwrap();
        assert_eq!(value, json!(""));
        assert_eq!(declared.name, "string");
    }

    #[test]
    fn test_default_candidates_pick_first_match() {
        let engine = engine();
        let mut conversion = Conversion::new(&engine);
        let rule = compile(json!({"t": "number", "d": ["abc", "7", 9]}));

        let (value, _) = default_value(&mut conversion, &rule, ROOT_UID).unwrap().unwrap();
        assert_eq!(value, json!("7"));
    }

    #[test]
    fn test_default_candidates_without_match() {
        let engine = engine();
        let mut conversion = Conversion::new(&engine);
        let rule = compile(json!({"t": "bool", "d": ["abc", 1]}));

        assert!(default_value(&mut conversion, &rule, ROOT_UID).unwrap().is_none());
    }

    #[test]
    fn test_sequence_default_list_is_literal() {
        let engine = engine();
        let mut conversion = Conversion::new(&engine);
        let rule = compile(json!({"t": "array", "d": ["a", "b"]}));

        let (value, _) = default_value(&mut conversion, &rule, ROOT_UID).unwrap().unwrap();
        assert_eq!(value, json!(["a", "b"]));
    }

    #[test]
    fn test_convert_object_registers_unstamped_map() {
        let engine = engine();
        let mut conversion = Conversion::new(&engine);
        let rule = compile(json!({"t": "object", "rules": {"a": {"t": "number"}}}));

        let value = convert_object(&mut conversion, Map::new(), &rule, ROOT_UID).unwrap();

        assert_eq!(value["a"], json!(0.0));
        assert_eq!(value["_parent"], json!(ROOT_UID));
        assert_eq!(conversion.graph().len(), 2);
    }
}
