//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables
//! - Command-line arguments

use crate::cli::EngineArgs;
use crate::error::{Error, Result};
use jsonbyket_core::{Defaults, Engine, EngineConfig, Globals};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Globals every conversion starts with
    pub globals: Globals,

    /// Default-setting overrides merged over the built-in defaults
    pub defaults: Option<Defaults>,

    /// Logging settings
    pub logging: LoggingSection,
}

/// Logging section of a configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) if !path.exists() => Err(Error::config(format!(
                "configuration file {} does not exist",
                path.display()
            ))),
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".jsonbyket.yaml"),
            PathBuf::from(".jsonbyket.yml"),
            PathBuf::from(".jsonbyket.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let jsonbyket_dir = config_dir.join("jsonbyket");
            paths.push(jsonbyket_dir.join("config.yaml"));
            paths.push(jsonbyket_dir.join("config.json"));
        }

        paths
    }

    /// Engine configuration with command-line overrides applied
    pub fn engine_config(&self, overrides: &EngineArgs) -> EngineConfig {
        let mut globals = self.globals.clone();
        if overrides.keep_hidden {
            globals.remove_hidden = false;
        }
        if let Some(level) = overrides.logging {
            globals.logging = level;
        }
        if overrides.traceback {
            globals.traceback_logging = true;
        }

        EngineConfig {
            globals,
            defaults: self.defaults.clone(),
        }
    }

    /// Build an engine with the built-in plugins and this configuration
    pub fn engine(&self, overrides: &EngineArgs) -> Engine {
        Engine::with_config(self.engine_config(overrides))
    }
}

/// Whether a path names a YAML document
pub fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}
