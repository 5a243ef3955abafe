use rest_tree::{Body, Folder, ResourcePath};

use super::{AppContext, TargetBuilder};
use crate::error::ConvertError;

/// Pass-through conversion with Field Table renaming (`ltm/rule`,
/// `ltm/snatpool`).
pub(super) fn convert(
    cx: &AppContext<'_>,
    kind: &str,
    name: &str,
    body: &Body,
    out: &mut Folder,
) -> Result<(), ConvertError> {
    let mut target = TargetBuilder::new(cx, kind, name);
    for (field, value) in body {
        if field != "class" {
            target.field(field, value)?;
        }
    }
    out.insert(ResourcePath::new(kind, name), target.finish());
    Ok(())
}

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use rest_tree::Folder;
    use serde_json::json;

    use super::convert;
    use crate::convert::test_support::{body, config, context, get};
    use crate::intermediate::Application;

    #[test]
    fn irule_text_is_decoded_and_renamed() {
        let config = config();
        let app = Application::default();
        let cx = context(&config, &app);
        let mut out = Folder::default();
        convert(
            &cx,
            "ltm/rule",
            "redirect",
            &body(json!({"class": "iRule", "iRule": {"base64": STANDARD.encode("when HTTP_REQUEST {}")}})),
            &mut out,
        )
        .expect("convert");
        assert_eq!(
            get(&out, "ltm/rule/redirect"),
            &body(json!({"name": "redirect", "apiAnonymous": "when HTTP_REQUEST {}"}))
        );
    }

    #[test]
    fn snatpool_addresses_become_members() {
        let config = config();
        let app = Application::default();
        let cx = context(&config, &app);
        let mut out = Folder::default();
        convert(
            &cx,
            "ltm/snatpool",
            "outbound",
            &body(json!({"class": "SNAT_Pool", "snatAddresses": ["192.0.2.1"]})),
            &mut out,
        )
        .expect("convert");
        assert_eq!(get(&out, "ltm/snatpool/outbound")["members"], json!(["192.0.2.1"]));
    }
}
