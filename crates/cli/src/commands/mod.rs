//! Subcommand implementations.

pub mod number;
pub mod reconcile;
pub mod split;

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors reading an input document.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Read a JSON or YAML document, picking the format by file extension.
///
/// # Errors
///
/// Returns `InputError` if the file cannot be read or parsed.
pub async fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let display = path.display().to_string();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| InputError::Read {
            path: display.clone(),
            source,
        })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&content).map_err(|source| InputError::Yaml {
            path: display,
            source,
        })
    } else {
        serde_json::from_str(&content).map_err(|source| InputError::Json {
            path: display,
            source,
        })
    }
}

/// Write a value to stdout as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
