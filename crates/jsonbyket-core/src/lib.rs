//! Jsonbyket Core - Rule-driven validation and conversion for JSON trees
//!
//! This crate converts a data tree against a separate rule document that
//! declares types, constraints, defaults and scoped variables, producing a
//! validated and normalized tree or failing with a diagnostic.
//!
//! # Main Components
//!
//! - **Engine**: Plugin registries and the `load`/`convert` entry points
//! - **Conversion**: Per-call state, the object graph and the dispatcher
//! - **Rulesets**: Rule documents compiled into a typed tree, including the
//!   `@`/`@@` directive language embedded in rule keys
//! - **Plugins**: Data types, variable types and transforms
//!
//! # Example
//!
//! ```no_run
//! use jsonbyket_core::{Engine, Result};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let engine = Engine::new();
//!     let rules = json!({"rules": {"port": {"t": "number", "int": true, "max": 65535}}});
//!     let out = engine.convert(json!({"port": "8080"}), &rules)?;
//!     assert_eq!(out, json!({"port": 8080}));
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod datatypes;
pub mod engine;
pub mod error;
pub mod graph;
pub mod interpreter;
pub mod resolver;
pub mod ruleset;
pub mod settings;
pub mod transformer;
pub mod value;
pub mod vartypes;

// Re-export main types for convenience
pub use context::{Conversion, ConversionReport, FATAL_EXIT_CODE};
pub use datatypes::DataType;
pub use engine::Engine;
pub use error::{Error, ErrorKind, Result};
pub use graph::{Node, ObjectGraph, ROOT_UID};
pub use ruleset::{RuleEntry, RuleKey, Ruleset, TypeSpec};
pub use settings::{Defaults, EngineConfig, Globals};
pub use transformer::Transform;
pub use vartypes::VariableType;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
