use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur while reading a JSON document.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Input bytes were not valid JSON.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to read input file.
    #[error("failed to read JSON file: {0}")]
    Io(#[from] std::io::Error),
    /// The document root was not a JSON object.
    #[error("malformed document: root must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Parse JSON bytes into an object document.
pub fn parse(json: &[u8]) -> Result<Map<String, Value>, ReadError> {
    match serde_json::from_slice::<Value>(json)? {
        Value::Object(map) => Ok(map),
        other => Err(ReadError::NotAnObject(value_kind(&other))),
    }
}

/// Parse a JSON file into an object document.
pub fn parse_file(path: &Path) -> Result<Map<String, Value>, ReadError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}

/// Short human-readable name of a JSON value's type.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
