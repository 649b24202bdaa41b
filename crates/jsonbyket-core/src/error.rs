//! Error types for the jsonbyket core library
//!
//! This module defines the error taxonomy of the conversion engine using
//! thiserror for the error definitions and anyhow for errors raised inside
//! third-party plugins.
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use thiserror::Error;

/// Main error type for jsonbyket operations
#[derive(Error, Debug)]
pub enum Error {
    /// The ruleset refers to something that is not registered or is malformed
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// A value does not satisfy its declared type, or a required property is missing
    #[error("Validation error: {field} - {message}")]
    Validation {
        field: String,
        message: String,
        expected: Option<String>,
        actual: Option<String>,
    },

    /// A reported constraint violation (sequence shorter than `minLength`)
    #[error("Constraint violation: {field} - {message}")]
    Constraint { field: String, message: String },

    /// A registered transform rejected its input
    #[error("Transform '{name}' failed: {message}")]
    Transform { name: String, message: String },

    /// An error raised inside a data type or variable type plugin
    #[error("Plugin '{name}' failed: {source}")]
    Plugin {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// A global setting could not be applied
    #[error("Settings error: {message}")]
    Settings { message: String },

    /// Object graph lookup for a UID that was never registered
    #[error("Object not found: {uid}")]
    UnknownNode { uid: String },

    /// JSON parsing errors for data or rule documents
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors while loading documents
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown names or malformed rules, never recoverable
    Schema,
    /// Value failed its declared type or a required property is missing
    Validation,
    /// Reported constraint violation
    Constraint,
    /// Reading or parsing input documents
    Io,
    /// Plugin, transform, settings or graph failures
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Schema => write!(f, "schema"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Constraint => write!(f, "constraint"),
            ErrorKind::Io => write!(f, "io"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

impl Error {
    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a validation error without expected/actual details
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Create a type mismatch error for a property
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let expected = expected.into();
        let actual = actual.into();
        Self::Validation {
            message: format!(
                "Property \"{}\" is supposed to be {}. Got \"{}\" instead.",
                field, expected, actual
            ),
            field,
            expected: Some(expected),
            actual: Some(actual),
        }
    }

    /// Create a constraint violation
    pub fn constraint(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Constraint {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a transform error
    pub fn transform(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transform {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Wrap an error raised by a plugin
    pub fn plugin(name: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Plugin {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a settings error
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Schema { .. } => ErrorKind::Schema,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Constraint { .. } => ErrorKind::Constraint,
            Self::Json { .. } | Self::Io { .. } => ErrorKind::Io,
            Self::Transform { .. }
            | Self::Plugin { .. }
            | Self::Settings { .. }
            | Self::UnknownNode { .. } => ErrorKind::Internal,
        }
    }

    /// Whether this error goes through the fatal path controlled by `tracebackLogging`
    pub fn is_fatal_by_default(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation | ErrorKind::Constraint)
    }
}
