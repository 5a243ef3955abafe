use rest_tree::{Body, Folder, ResourcePath};
use serde_json::Value;

use super::{reference, AppContext, TargetBuilder};
use crate::error::ConvertError;

const KIND: &str = "ltm/pool";

/// How the monitor references combine into one expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonitorRule {
    All,
    AtLeast(u64),
}

impl MonitorRule {
    fn parse(name: &str, value: &Value) -> Result<Self, ConvertError> {
        match value {
            Value::String(token) if token == "all" => Ok(Self::All),
            Value::Number(n) => n.as_u64().map(Self::AtLeast).ok_or_else(|| {
                ConvertError::malformed(name, "minimumMonitors must be a non-negative integer")
            }),
            _ => Err(ConvertError::malformed(
                name,
                "minimumMonitors must be 'all' or a number",
            )),
        }
    }

    fn expression(self, monitors: &[String]) -> String {
        match self {
            Self::All => monitors.join(" and "),
            Self::AtLeast(n) => format!("min {n} of {}", monitors.join(" ")),
        }
    }
}

pub(super) fn convert(
    cx: &AppContext<'_>,
    name: &str,
    body: &Body,
    out: &mut Folder,
) -> Result<(), ConvertError> {
    let mut pool = TargetBuilder::new(cx, KIND, name);
    let mut monitors = Vec::new();
    let mut rule = MonitorRule::AtLeast(1);

    for (field, value) in body {
        match field.as_str() {
            // Member arrangement belongs to the device-side pool members API.
            "class" | "members" => {}
            "monitors" => {
                let Value::Array(items) = value else {
                    return Err(ConvertError::malformed(name, "monitors must be an array"));
                };
                monitors.extend(items.iter().filter_map(reference).map(|monitor| {
                    if monitor == "icmp" {
                        "gateway_icmp".to_string()
                    } else {
                        monitor
                    }
                }));
            }
            "minimumMonitors" => rule = MonitorRule::parse(name, value)?,
            _ => pool.field(field, value)?,
        }
    }

    let monitor = if monitors.is_empty() {
        String::new()
    } else {
        rule.expression(&monitors)
    };
    pool.set("monitor", monitor);
    out.insert(ResourcePath::new(KIND, name), pool.finish());
    Ok(())
}
