use rest_tree::{Body, Folder, ResourcePath};
use serde_json::Value;

use super::{AppContext, TargetBuilder};
use crate::error::ConvertError;

const KIND: &str = "ltm/virtual-address";

/// Explicit `Service_Address` → `ltm/virtual-address/<address>`.
///
/// The object is keyed and named by its address, not its declared name:
/// the device enforces address uniqueness per partition.
pub(super) fn convert(
    cx: &AppContext<'_>,
    name: &str,
    body: &Body,
    out: &mut Folder,
) -> Result<(), ConvertError> {
    let address = body
        .get("virtualAddress")
        .and_then(Value::as_str)
        .ok_or_else(|| ConvertError::missing(KIND, name, "virtualAddress"))?;

    let mut target = TargetBuilder::new(cx, KIND, address);
    for (field, value) in body {
        match (field.as_str(), value) {
            ("class", _) => {}
            ("icmpEcho" | "routeAdvertisement", Value::String(mode)) => {
                target.renamed(field, Value::String(abled(mode)))
            }
            _ => target.field(field, value)?,
        }
    }
    target.set("name", address);
    out.insert(ResourcePath::new(KIND, address), target.finish());
    Ok(())
}

/// `enable` → `enabled`, `selective` unchanged.
fn abled(mode: &str) -> String {
    match mode.strip_suffix("able") {
        Some(stem) => format!("{stem}abled"),
        None => mode.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rest_tree::Folder;
    use serde_json::json;

    use super::{abled, convert};
    use crate::convert::test_support::{body, config, context, get};
    use crate::error::ConvertError;
    use crate::intermediate::Application;

    #[test]
    fn keyed_by_address_with_abled_modes() {
        let config = config();
        let app = Application::default();
        let cx = context(&config, &app);
        let mut out = Folder::default();
        convert(
            &cx,
            "front",
            &body(json!({
                "class": "Service_Address",
                "virtualAddress": "10.1.1.1",
                "arpEnabled": false,
                "icmpEcho": "disable",
                "routeAdvertisement": "selective"
            })),
            &mut out,
        )
        .expect("convert");
        let va = get(&out, "ltm/virtual-address/10.1.1.1");
        assert_eq!(va["name"], json!("10.1.1.1"));
        assert_eq!(va["address"], json!("10.1.1.1"));
        assert_eq!(va["arp"], json!("disabled"));
        assert_eq!(va["icmpEcho"], json!("disabled"));
        assert_eq!(va["routeAdvertisement"], json!("selective"));
    }

    #[test]
    fn address_is_required() {
        let config = config();
        let app = Application::default();
        let cx = context(&config, &app);
        let err = convert(&cx, "front", &body(json!({"arpEnabled": true})), &mut Folder::default())
            .expect_err("no address");
        assert!(matches!(err, ConvertError::MissingRequiredField { .. }));
    }

    #[test]
    fn abled_only_touches_suffix() {
        assert_eq!(abled("enable"), "enabled");
        assert_eq!(abled("always"), "always");
    }
}
