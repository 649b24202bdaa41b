//! JSON value helpers shared by the engine
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use serde_json::{Map, Value};

/// Bookkeeping key holding a node's UID
pub const UID_KEY: &str = "_uid";
/// Bookkeeping key holding the UID of a node's parent
pub const PARENT_KEY: &str = "_parent";
/// Bookkeeping key holding a node's variable scope
pub const VARIABLES_KEY: &str = "_variables";
/// Bookkeeping key holding a node's defaults snapshot
pub const DEFAULTS_KEY: &str = "_defaults";

/// All bookkeeping keys stamped onto converted objects
pub const HIDDEN_KEYS: [&str; 4] = [PARENT_KEY, UID_KEY, VARIABLES_KEY, DEFAULTS_KEY];

/// Merge `source` into `target`.
///
/// Scalars and keys missing from `target` overwrite, objects merge
/// recursively, arrays replace the target wholesale.
pub fn merge_into(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_into(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

/// Set `value` at a dotted key path inside `target`, merging when both sides are objects.
///
/// Intermediate objects are created as needed; a non-object intermediate is replaced.
pub fn set_path(target: &mut Map<String, Value>, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = target;
    for segment in parents {
        let entry = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => unreachable!("entry was just made an object"),
        };
    }

    let mut patch = Map::new();
    patch.insert(last.clone(), value);
    merge_into(current, patch);
}

/// Human-readable name for the kind of a JSON value
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Truthiness of a rule flag such as `r`, `autoAdd` or `int`
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Recursively remove the bookkeeping keys from every object and array level
pub fn strip_hidden(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in HIDDEN_KEYS {
                map.shift_remove(key);
            }
            for child in map.values_mut() {
                strip_hidden(child);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                strip_hidden(item);
            }
        }
        _ => {}
    }
}

/// Build a JSON number from an `f64`, falling back to null for non-finite values
pub fn number_value(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_merge_scalars_overwrite_and_objects_merge() {
        let mut target = as_map(json!({"a": 1, "nested": {"x": 1, "y": 2}, "list": [1, 2, 3]}));
        let source = as_map(json!({"a": 2, "nested": {"y": 3, "z": 4}, "list": [9], "new": true}));

        merge_into(&mut target, source);

        assert_eq!(
            Value::Object(target),
            json!({"a": 2, "nested": {"x": 1, "y": 3, "z": 4}, "list": [9], "new": true})
        );
    }

    #[test]
    fn test_merge_object_over_scalar_replaces() {
        let mut target = as_map(json!({"unit": "m"}));
        merge_into(&mut target, as_map(json!({"unit": {"distance": "km"}})));
        assert_eq!(target["unit"], json!({"distance": "km"}));
    }

    #[test]
    fn test_set_path_creates_intermediates() {
        let mut target = as_map(json!({"unit": {"time": "s", "distance": "m"}}));
        set_path(&mut target, &["unit".into(), "time".into()], json!("ms"));
        set_path(&mut target, &["deep".into(), "er".into()], json!(1));

        assert_eq!(target["unit"], json!({"time": "ms", "distance": "m"}));
        assert_eq!(target["deep"], json!({"er": 1}));
    }

    #[test]
    fn test_strip_hidden_recurses_into_arrays() {
        let mut value = json!({
            "_uid": "1",
            "_parent": "ROOT",
            "items": [{"_uid": "2", "_defaults": {}, "name": "a"}],
            "child": {"_variables": {}, "keep": 1}
        });

        strip_hidden(&mut value);

        assert_eq!(value, json!({"items": [{"name": "a"}], "child": {"keep": 1}}));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(kind_name(&json!(1)), "int");
        assert_eq!(kind_name(&json!(1.5)), "float");
        assert_eq!(kind_name(&json!("x")), "str");
        assert_eq!(kind_name(&json!({})), "dict");
    }
}
