//! Transform chains applied after conversion
//!
//! A ruleset's `t` may carry a transform suffix, `"number:round,abs"`. After
//! the data type converted the value, each named transform is looked up in
//! the engine's registry and applied in order.
//!
//! # Module Organization
//!
//! - [`types`] - The [`Transform`] record and the transform function signature
//! - [`pipeline`] - Applies a transform chain to a converted value
//! - [`built_in`] - Transforms every engine starts with
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

pub mod types;

pub mod pipeline;

pub mod built_in;

#[cfg(test)]
mod tests;

pub use types::{Transform, TransformFn};
