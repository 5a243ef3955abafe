use rest_tree::Body;
use serde_json::{Map, Value};
use tracing::warn;

use super::AppContext;
use crate::error::ConvertError;
use crate::secret::decode_base64_text;

/// Accumulates one target object under a Field Table kind.
///
/// Declaration fields go through [`TargetBuilder::field`] (value coercion,
/// rename, version gate); fields the converter computes itself use
/// [`TargetBuilder::set`].
pub(crate) struct TargetBuilder<'a> {
    cx: &'a AppContext<'a>,
    kind: String,
    body: Body,
}

impl<'a> TargetBuilder<'a> {
    pub fn new(cx: &'a AppContext<'a>, kind: impl Into<String>, name: &str) -> Self {
        let mut body = Map::new();
        body.insert("name".to_string(), Value::String(name.to_string()));
        Self::with_body(cx, kind, body)
    }

    /// A builder with no `name` field, for sub-objects and shared fields.
    pub fn nameless(cx: &'a AppContext<'a>, kind: impl Into<String>) -> Self {
        Self::with_body(cx, kind, Map::new())
    }

    fn with_body(cx: &'a AppContext<'a>, kind: impl Into<String>, body: Body) -> Self {
        Self {
            cx,
            kind: kind.into(),
            body,
        }
    }

    /// Apply the generic rule to a declaration field.
    pub fn field(&mut self, field: &str, value: &Value) -> Result<(), ConvertError> {
        let converted = convert_value(self.cx, &self.kind, field, value)?;
        self.renamed(field, converted);
        Ok(())
    }

    /// Store an already-converted value under the renamed field, unless the
    /// configured device version predates it.
    pub fn renamed(&mut self, field: &str, value: Value) {
        let table = self.cx.table();
        let version = self.cx.config.device_version.as_ref();
        if !table.supported_on(&self.kind, field, version) {
            warn!(
                kind = %self.kind,
                field,
                version = ?version.map(ToString::to_string),
                "field not supported on device version; omitted"
            );
            return;
        }
        let target = table.rest_name(&self.kind, field).to_string();
        self.body.insert(target, value);
    }

    /// Store a value under a literal target field.
    pub fn set(&mut self, target: &str, value: impl Into<Value>) {
        self.body.insert(target.to_string(), value.into());
    }

    pub fn contains(&self, target: &str) -> bool {
        self.body.contains_key(target)
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn finish(self) -> Body {
        self.body
    }
}

/// The generic value rule: booleans through the Field Table tokens, wrapper
/// objects unwrapped, everything else unchanged.
fn convert_value(
    cx: &AppContext<'_>,
    kind: &str,
    field: &str,
    value: &Value,
) -> Result<Value, ConvertError> {
    match value {
        Value::Bool(flag) => Ok(cx.table().coerce_bool(kind, field, *flag)),
        Value::Object(wrapper) => unwrap_wrapper(field, wrapper),
        other => Ok(other.clone()),
    }
}

fn unwrap_wrapper(field: &str, wrapper: &Map<String, Value>) -> Result<Value, ConvertError> {
    if let Some(encoded) = wrapper.get("base64") {
        let encoded = encoded
            .as_str()
            .ok_or_else(|| ConvertError::malformed(field, "'base64' must be a string"))?;
        return decode_base64_text(encoded)
            .map(Value::String)
            .map_err(|reason| ConvertError::malformed(field, reason));
    }
    if let Some(text) = wrapper.get("text") {
        return Ok(text.clone());
    }
    for key in ["url", "copyFrom"] {
        if let Some(target) = wrapper.get(key) {
            return Err(ConvertError::UnsupportedReference {
                field: field.to_string(),
                reference: match target {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            });
        }
    }
    if let Some(path) = reference_of(wrapper) {
        return Ok(Value::String(path.to_string()));
    }
    Ok(Value::Object(wrapper.clone()))
}

fn reference_of(wrapper: &Map<String, Value>) -> Option<&str> {
    wrapper
        .get("use")
        .or_else(|| wrapper.get("bigip"))
        .and_then(Value::as_str)
}

/// A reference as a path string: a bare string, `{use}` or `{bigip}`.
pub(crate) fn reference(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(wrapper) => reference_of(wrapper).map(str::to_string),
        _ => None,
    }
}
