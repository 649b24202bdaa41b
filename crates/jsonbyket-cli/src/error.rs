//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use jsonbyket_core::{ErrorKind, FATAL_EXIT_CODE};
use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from jsonbyket-core
    #[error("{0}")]
    Core(#[from] jsonbyket_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: expected {} ({})", path.display(), expected, reason)]
    InvalidFormat {
        path: PathBuf,
        expected: String,
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error.
    ///
    /// Validation and constraint failures share the code the engine uses when
    /// it terminates the process itself.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(e) => match e.kind() {
                ErrorKind::Validation | ErrorKind::Constraint => FATAL_EXIT_CODE,
                ErrorKind::Schema => 3,
                ErrorKind::Io => 1,
                ErrorKind::Internal => 4,
            },
            Self::FileNotFound { .. } => 5,
            Self::InvalidFormat { .. } => 6,
            Self::Config(_) => 7,
            Self::Json(_) => 8,
            Self::Yaml(_) => 9,
            Self::Other { .. } => 99,
        }
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_core_kind() {
        let validation = Error::Core(jsonbyket_core::Error::validation("x", "bad"));
        assert_eq!(validation.exit_code(), FATAL_EXIT_CODE);

        let schema = Error::Core(jsonbyket_core::Error::schema("unknown type"));
        assert_eq!(schema.exit_code(), 3);

        let missing = Error::FileNotFound {
            path: PathBuf::from("nope.json"),
        };
        assert_eq!(missing.exit_code(), 5);
    }

    #[test]
    fn test_format_error_without_color() {
        let error = Error::Core(jsonbyket_core::Error::schema("Invalid DataType \"x\""));
        assert_eq!(
            format_error(&error, false),
            "Error: Schema error: Invalid DataType \"x\""
        );
        assert_eq!(format_error(&Error::config("bad"), false), "Error: Configuration error: bad");
    }
}
