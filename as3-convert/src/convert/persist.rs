use rest_tree::{Body, Folder, ResourcePath};
use serde_json::Value;

use super::{AppContext, TargetBuilder};
use crate::error::ConvertError;
use crate::secret::decode_secret;

pub(super) fn convert(
    cx: &AppContext<'_>,
    method: &str,
    name: &str,
    body: &Body,
    out: &mut Folder,
) -> Result<(), ConvertError> {
    let kind = format!("ltm/persistence/{method}");
    let mut persist = TargetBuilder::new(cx, kind.as_str(), name);
    for (field, value) in body {
        match field.as_str() {
            "class" | "persistenceMethod" => {}
            "duration" if value.as_f64() == Some(0.0) => {
                persist.renamed(field, Value::String("indefinite".to_string()))
            }
            "passphrase" => {
                let secret = decode_secret(&format!("{name}.passphrase"), value)?;
                persist.renamed(field, Value::String(secret));
            }
            _ => persist.field(field, value)?,
        }
    }
    out.insert(ResourcePath::new(kind, name), persist.finish());
    Ok(())
}
