use rest_tree::{Body, Folder, ResourcePath};
use serde_json::Value;

use crate::convert::{AppContext, TargetBuilder};
use crate::error::ConvertError;

const KIND: &str = "ltm/profile/tcp";

pub(super) fn convert(
    cx: &AppContext<'_>,
    name: &str,
    body: &Body,
    out: &mut Folder,
) -> Result<(), ConvertError> {
    let mut profile = TargetBuilder::new(cx, KIND, name);
    for (field, value) in body {
        match (field.as_str(), value) {
            ("class", _) => {}
            ("mptcp", Value::String(mode)) => profile.renamed(field, Value::String(mptcp(mode))),
            _ => profile.field(field, value)?,
        }
    }
    out.insert(ResourcePath::new(KIND, name), profile.finish());
    Ok(())
}

/// `enable` → `enabled`; `passthrough` is already a device token.
fn mptcp(mode: &str) -> String {
    if mode == "passthrough" {
        mode.to_string()
    } else {
        format!("{mode}d")
    }
}
