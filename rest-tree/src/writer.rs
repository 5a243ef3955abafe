use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::tree::ObjectSet;

/// Errors that can occur while writing an [`ObjectSet`] as JSON.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize JSON.
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to write output file.
    #[error("failed to write JSON file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize an [`ObjectSet`] into pretty-printed JSON bytes.
pub fn write(set: &ObjectSet) -> Result<Vec<u8>, WriteError> {
    let mut bytes = serde_json::to_vec_pretty(set)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Serialize an [`ObjectSet`] and write it to `path`.
pub fn write_file(set: &ObjectSet, path: &Path) -> Result<(), WriteError> {
    let bytes = write(set)?;
    fs::write(path, bytes)?;
    Ok(())
}
