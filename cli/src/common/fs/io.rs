//! # AAZ Editor Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` used by the workspace manager and the
//! generator. Every function adds the offending path to its error context.
//!
//! - **`ensure_dir_exists`**: `mkdir -p`, failing if the path is a file.
//! - **`read_json` / `write_json`**: typed JSON documents (`ws.json`, command configurations).
//! - **`write_string_to_file`**: writes text, creating parent directories first.
//! - **`modified_timestamp`**: file mtime as fractional UNIX seconds, the `updated` field of API responses.
//!
use crate::core::error::{EditorError, Result};
use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creating
/// the directory fails.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(EditorError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Writes string content to a file, creating its parent directory if needed.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    debug!("Wrote content to file: {:?}", path);
    Ok(())
}

/// Reads and deserializes a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON from {:?}", path))
}

/// Serializes a document as pretty JSON and writes it.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize JSON for {:?}", path))?;
    write_string_to_file(path, &content)
}

/// Modification time of `path` in seconds since the UNIX epoch.
pub fn modified_timestamp(path: &Path) -> Result<f64> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("Failed to read modification time of {:?}", path))?;
    let since_epoch = modified
        .duration_since(UNIX_EPOCH)
        .with_context(|| format!("Modification time of {:?} is before the epoch", path))?;
    Ok(since_epoch.as_secs_f64())
}
