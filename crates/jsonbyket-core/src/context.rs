//! Per-conversion state and the conversion dispatcher
//!
//! A [`Conversion`] is created fresh for every top-level conversion. It owns
//! the object graph, the UID counter and the globals of that pass, and
//! borrows the plugin registries from the [`Engine`]. Nothing is shared
//! between passes, so one engine can serve concurrent conversions.
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::graph::{ObjectGraph, ROOT_UID};
use crate::ruleset::{Ruleset, TypeSpec};
use crate::settings::{Defaults, Globals};
use crate::transformer::pipeline;
use crate::value::{kind_name, strip_hidden, PARENT_KEY, UID_KEY};
use serde::Serialize;
use serde_json::Value;

/// Exit code used when a fatal error terminates the process
pub const FATAL_EXIT_CODE: i32 = 2;

/// Marker starting an inline comment inside string values
const INLINE_COMMENT: &str = "//";

/// Log level used for resolution warnings
pub const WARN_LEVEL: i64 = 4;

/// Summary of a finished conversion
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionReport {
    /// Nodes registered in the object graph, root included
    pub nodes: usize,
    /// Non-fatal warnings emitted during the pass
    pub warnings: Vec<String>,
}

/// State of a single conversion pass
pub struct Conversion<'e> {
    engine: &'e Engine,
    graph: ObjectGraph,
    globals: Globals,
    warnings: Vec<String>,
}

impl<'e> Conversion<'e> {
    /// Start a pass with the engine's configured globals and defaults
    pub fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            graph: ObjectGraph::new(engine.config().effective_defaults()),
            globals: engine.config().globals.clone(),
            warnings: Vec::new(),
        }
    }

    /// The engine whose registries this pass uses
    pub fn engine(&self) -> &'e Engine {
        self.engine
    }

    /// The object graph of this pass
    pub fn graph(&self) -> &ObjectGraph {
        &self.graph
    }

    /// Mutable access to the object graph
    pub fn graph_mut(&mut self) -> &mut ObjectGraph {
        &mut self.graph
    }

    /// Current globals, including changes made by `@@` directives
    pub fn globals(&self) -> &Globals {
        &self.globals
    }

    /// Mutable access to the globals of this pass
    pub fn globals_mut(&mut self) -> &mut Globals {
        &mut self.globals
    }

    /// Defaults snapshot of a node
    pub fn defaults(&self, uid: &str) -> Result<&Defaults> {
        Ok(&self.graph.node(uid)?.defaults)
    }

    /// Warnings collected so far
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Emit a message if `level` reaches the `logging` threshold
    pub fn log(&self, level: i64, message: &str) {
        if level < self.globals.logging {
            return;
        }
        match level {
            i64::MIN..=1 => tracing::trace!(target: "jsonbyket", "{}", message),
            2 => tracing::debug!(target: "jsonbyket", "{}", message),
            3 => tracing::info!(target: "jsonbyket", "{}", message),
            4 => tracing::warn!(target: "jsonbyket", "{}", message),
            _ => tracing::error!(target: "jsonbyket", "{}", message),
        }
    }

    /// Record and log a non-fatal warning
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.log(WARN_LEVEL, &message);
        self.warnings.push(message);
    }

    /// Route an error through the fatal policy.
    ///
    /// Validation and constraint errors terminate the process unless
    /// `tracebackLogging` is enabled; everything else is returned as is.
    pub fn fatal(&self, error: Error) -> Error {
        if error.is_fatal_by_default() && !self.globals.traceback_logging {
            tracing::error!(target: "jsonbyket", kind = %error.kind(), "{}", error);
            eprintln!("{}", error);
            std::process::exit(FATAL_EXIT_CODE);
        }
        error
    }

    /// Convert a whole data tree against a compiled root ruleset
    pub fn run(mut self, data: Value, root: &Ruleset) -> Result<(Value, ConversionReport)> {
        let mut value = self.convert_node(data, root, ROOT_UID, "root", Some(ROOT_UID))?;
        if self.globals.remove_hidden {
            strip_hidden(&mut value);
        }
        let report = ConversionReport {
            nodes: self.graph.len(),
            warnings: self.warnings,
        };
        Ok((value, report))
    }

    /// Look up a rule entry and resolve variables in it
    pub fn rule_value(&mut self, rule: &Ruleset, key: &str, parent: &str) -> Result<Option<Value>> {
        match rule.get(key) {
            Some(value) => self.resolve(value.clone(), parent, rule).map(Some),
            None => Ok(None),
        }
    }

    /// Convert one value against its ruleset; the single re-entrant entry point
    pub fn convert_single(
        &mut self,
        value: Value,
        rule: &Ruleset,
        parent: &str,
        name: &str,
    ) -> Result<Value> {
        self.convert_node(value, rule, parent, name, None)
    }

    /// Like [`convert_single`](Self::convert_single), reusing `uid` for a mapping value.
    ///
    /// Reusing a UID that is already registered merges the new mapping into the
    /// existing node instead of registering a second one.
    pub fn convert_node(
        &mut self,
        value: Value,
        rule: &Ruleset,
        parent: &str,
        name: &str,
        uid: Option<&str>,
    ) -> Result<Value> {
        let any = TypeSpec::bare("any");
        let type_spec = rule.type_spec().unwrap_or(&any);
        self.dispatch(value, rule, type_spec, parent, name, uid)
    }

    /// Dispatch a value to the data type named by `type_spec`
    pub(crate) fn dispatch(
        &mut self,
        value: Value,
        rule: &Ruleset,
        type_spec: &TypeSpec,
        parent: &str,
        name: &str,
        uid: Option<&str>,
    ) -> Result<Value> {
        let value = self.resolve(strip_inline_comment(value), parent, rule)?;
        self.dispatch_resolved(value, rule, type_spec, parent, name, uid)
    }

    /// Like [`dispatch`](Self::dispatch) for a value whose variables are already resolved.
    ///
    /// Synthesized defaults take this path so they are resolved exactly once.
    pub(crate) fn dispatch_resolved(
        &mut self,
        value: Value,
        rule: &Ruleset,
        type_spec: &TypeSpec,
        parent: &str,
        name: &str,
        uid: Option<&str>,
    ) -> Result<Value> {
        let uid = match uid {
            Some(uid) => uid.to_string(),
            None => self.graph.generate_uid(),
        };

        let engine = self.engine;
        let data_type = engine.data_type(&type_spec.name).ok_or_else(|| {
            Error::schema(format!("Invalid DataType \"{}\"", type_spec.name))
        })?;

        if !data_type.matches(&value) {
            return Err(self.fatal(Error::type_mismatch(
                name,
                &type_spec.name,
                kind_name(&value),
            )));
        }

        let converted = match value {
            Value::Object(mut map) if data_type.registers_nodes() => {
                map.insert(UID_KEY.to_string(), Value::String(uid.clone()));
                map.insert(PARENT_KEY.to_string(), Value::String(parent.to_string()));
                self.log(0, &format!("registering node {} under {}", uid, parent));
                let payload = self.graph.register(&uid, parent, map)?;
                data_type.convert(Value::Object(payload), rule, self, parent)?
            }
            other => data_type.convert(other, rule, self, parent)?,
        };

        pipeline::apply(self, converted, rule, &type_spec.transforms, parent)
    }
}

pub(crate) fn strip_inline_comment(value: Value) -> Value {
    match value {
        Value::String(s) => match s.find(INLINE_COMMENT) {
            Some(index) => Value::String(s[..index].to_string()),
            None => Value::String(s),
        },
        other => other,
    }
}
