//! Shared utilities for command handlers

use crate::cli::OutputFormat;
use crate::config::is_yaml;
use crate::error::{Error, Result};
use crate::output::OutputFormatter;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load a JSON or YAML document, chosen by file extension
pub fn load_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "read document");

    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
            reason: e.to_string(),
        })
    } else {
        serde_json::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
            reason: e.to_string(),
        })
    }
}

/// Write a document, as YAML for `.yaml`/`.yml` paths and pretty JSON otherwise
pub fn save_document(path: &Path, value: &Value) -> Result<()> {
    let format = if is_yaml(path) {
        OutputFormat::Yaml
    } else {
        OutputFormat::JsonPretty
    };
    let mut content = format.format(value)?;
    if !content.ends_with('\n') {
        content.push('\n');
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
