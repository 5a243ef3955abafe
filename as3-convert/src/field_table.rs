//! Per-field rename and coercion metadata.
//!
//! The table maps a resource kind (`ltm/virtual`, `ltm/profile/http`) to the
//! declaration fields it knows about. Each record names the device field the
//! value is written to, optional tokens that replace `true`/`false`, and the
//! minimum device version that understands the field. Fields absent from the
//! table pass through unchanged.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::version::DeviceVersion;

/// One field record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    #[serde(rename = "restname")]
    pub rest_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub truth: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub falsehood: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub min_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub quoted_string: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub int_to_string: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_modules: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldSpec {
    /// The minimum device version for this field, when one is declared and
    /// parses.
    pub fn min_version(&self) -> Option<DeviceVersion> {
        if self.min_version.trim().is_empty() {
            return None;
        }
        self.min_version.parse().ok()
    }

    /// True when `version` can carry this field. Unknown versions carry all.
    pub fn supported_on(&self, version: Option<&DeviceVersion>) -> bool {
        match (self.min_version(), version) {
            (Some(min), Some(version)) => *version >= min,
            _ => true,
        }
    }
}

/// Errors returned when loading or generating a field table.
#[derive(Debug, Error)]
pub enum FieldTableError {
    #[error("failed to read field table {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse field table {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("malformed vendor property '{key}': {reason}")]
    Vendor { key: String, reason: String },
}

/// Kind → declaration field → record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldTable {
    kinds: BTreeMap<String, BTreeMap<String, FieldSpec>>,
}

impl FieldTable {
    /// The table compiled into the binary.
    pub fn embedded() -> Result<Self, FieldTableError> {
        let raw = include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tables/rest.properties.json"
        ));
        Self::from_json_str(raw, "embedded field table")
    }

    /// Load a table file produced by [`FieldTable::from_vendor_properties`].
    pub fn load(path: &Path) -> Result<Self, FieldTableError> {
        let raw = fs::read_to_string(path).map_err(|source| FieldTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw, path.display().to_string())
    }

    pub fn from_json_str(raw: &str, origin: impl Into<String>) -> Result<Self, FieldTableError> {
        serde_json::from_str(raw).map_err(|source| FieldTableError::Parse {
            path: origin.into(),
            source,
        })
    }

    /// Insert or replace one record.
    pub fn insert(&mut self, kind: &str, field: &str, spec: FieldSpec) {
        self.kinds
            .entry(kind.to_string())
            .or_default()
            .insert(field.to_string(), spec);
    }

    /// Find the record for `field` under `kind`, falling back to the kind's
    /// two-segment namespace (`ltm/monitor/http` → `ltm/monitor`).
    pub fn lookup(&self, kind: &str, field: &str) -> Option<&FieldSpec> {
        self.kinds
            .get(kind)
            .and_then(|fields| fields.get(field))
            .or_else(|| {
                let ns = namespace_of(kind);
                if ns == kind {
                    return None;
                }
                self.kinds.get(ns).and_then(|fields| fields.get(field))
            })
    }

    /// The device field name for `field`; unmapped names are returned as-is.
    pub fn rest_name<'a>(&'a self, kind: &str, field: &'a str) -> &'a str {
        match self.lookup(kind, field) {
            Some(spec) if !spec.rest_name.is_empty() => &spec.rest_name,
            _ => field,
        }
    }

    /// Map a boolean through the field's truth/falsehood tokens when defined.
    pub fn coerce_bool(&self, kind: &str, field: &str, value: bool) -> Value {
        if let Some(spec) = self.lookup(kind, field) {
            if value && !spec.truth.is_empty() {
                return Value::String(spec.truth.clone());
            }
            if !value && !spec.falsehood.is_empty() {
                return Value::String(spec.falsehood.clone());
            }
        }
        Value::Bool(value)
    }

    /// True when `field` is usable on `version` (always true when unknown).
    pub fn supported_on(&self, kind: &str, field: &str, version: Option<&DeviceVersion>) -> bool {
        self.lookup(kind, field)
            .map_or(true, |spec| spec.supported_on(version))
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.kinds.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a table from the vendor property file.
    ///
    /// Only `ltm *` keys are kept. `"ltm profile http"` becomes
    /// `ltm/profile/http`; each record is keyed by its `altId` (else `id`),
    /// gets `restname` = camel-cased `id`, and loses `id`/`altId`.
    pub fn from_vendor_properties(vendor: &Value) -> Result<Self, FieldTableError> {
        let Value::Object(entries) = vendor else {
            return Err(FieldTableError::Vendor {
                key: "<root>".to_string(),
                reason: "expected a JSON object".to_string(),
            });
        };

        let mut table = FieldTable::default();
        for (key, records) in entries {
            if !key.starts_with("ltm ") {
                continue;
            }
            let kind = key.replace(' ', "/");
            let Value::Array(records) = records else {
                return Err(FieldTableError::Vendor {
                    key: key.clone(),
                    reason: "expected an array of property records".to_string(),
                });
            };
            let fields = table.kinds.entry(kind).or_default();
            for record in records {
                let (field, spec) = vendor_record(key, record)?;
                fields.insert(field, spec);
            }
        }
        Ok(table)
    }
}

fn vendor_record(key: &str, record: &Value) -> Result<(String, FieldSpec), FieldTableError> {
    let mut object = record
        .as_object()
        .cloned()
        .ok_or_else(|| FieldTableError::Vendor {
            key: key.to_string(),
            reason: "property record is not an object".to_string(),
        })?;
    let id = object
        .remove("id")
        .and_then(|id| id.as_str().map(str::to_string))
        .ok_or_else(|| FieldTableError::Vendor {
            key: key.to_string(),
            reason: "property record has no string 'id'".to_string(),
        })?;
    let field = match object.remove("altId") {
        Some(Value::String(alt)) => alt,
        _ => id.clone(),
    };
    object.insert("restname".to_string(), Value::String(camel_case(&id)));

    let spec = serde_json::from_value(Value::Object(object)).map_err(|err| {
        FieldTableError::Vendor {
            key: format!("{key} {field}"),
            reason: err.to_string(),
        }
    })?;
    Ok((field, spec))
}

/// `ip-protocol` → `ipProtocol`.
pub fn camel_case(id: &str) -> String {
    let mut words = id.split('-');
    let mut out = words.next().unwrap_or_default().to_string();
    for word in words {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// The first two segments of a kind.
pub fn namespace_of(kind: &str) -> &str {
    match kind.match_indices('/').nth(1) {
        Some((idx, _)) => &kind[..idx],
        None => kind,
    }
}
