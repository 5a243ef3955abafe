use rest_tree::{Body, Folder, ResourcePath};
use serde_json::Value;

use super::{AppContext, TargetBuilder};
use crate::error::ConvertError;

pub(super) fn convert(
    cx: &AppContext<'_>,
    monitor_type: &str,
    name: &str,
    body: &Body,
    out: &mut Folder,
) -> Result<(), ConvertError> {
    let kind = format!("ltm/monitor/{monitor_type}");
    let mut monitor = TargetBuilder::new(cx, kind.as_str(), name);
    for (field, value) in body {
        match (field.as_str(), value) {
            ("class" | "monitorType", _) => {}
            ("send" | "receive", Value::String(text)) => {
                monitor.renamed(field, Value::String(escape_line_breaks(text)))
            }
            _ => monitor.field(field, value)?,
        }
    }
    out.insert(ResourcePath::new(kind, name), monitor.finish());
    Ok(())
}

/// Literal CR/LF become the two-character escapes the device expects.
fn escape_line_breaks(text: &str) -> String {
    text.replace('\r', "\\r").replace('\n', "\\n")
}
