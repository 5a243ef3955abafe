use rest_tree::{Body, Folder, ResourcePath};
use serde_json::Value;

use crate::convert::{AppContext, TargetBuilder};
use crate::error::ConvertError;

const KIND: &str = "ltm/profile/http";
const HSTS_KIND: &str = "ltm/profile/http/hsts";
const HSTS_PREFIX: &str = "hsts";

pub(super) fn convert(
    cx: &AppContext<'_>,
    name: &str,
    body: &Body,
    out: &mut Folder,
) -> Result<(), ConvertError> {
    let mut profile = TargetBuilder::new(cx, KIND, name);
    let mut hsts = TargetBuilder::nameless(cx, HSTS_KIND);

    for (field, value) in body {
        match field.as_str() {
            "class" => {}
            "requestChunking" | "responseChunking" if coalesces(cx, value) => {
                profile.renamed(field, Value::String("sustain".to_string()))
            }
            "insertHeader" => profile.renamed(field, header_line(name, value)?),
            _ => match hsts_field(field) {
                Some(inner) => hsts.field(&inner, value)?,
                None => profile.field(field, value)?,
            },
        }
    }

    if !hsts.is_empty() {
        profile.set("hsts", Value::Object(hsts.finish()));
    }
    out.insert(ResourcePath::new(KIND, name), profile.finish());
    Ok(())
}

/// `selective`/`preserve` chunking collapses to `sustain` from v15 on.
fn coalesces(cx: &AppContext<'_>, value: &Value) -> bool {
    matches!(value.as_str(), Some("selective" | "preserve")) && cx.config.device_at_least(15)
}

/// `{name, value}` → `"name: value"`.
fn header_line(profile: &str, value: &Value) -> Result<Value, ConvertError> {
    let field = |key: &str| value.get(key).and_then(Value::as_str);
    match (field("name"), field("value")) {
        (Some(name), Some(content)) => Ok(Value::String(format!("{name}: {content}"))),
        _ => Err(ConvertError::malformed(
            profile,
            "insertHeader needs string 'name' and 'value'",
        )),
    }
}

/// `hstsIncludeSubdomains` → `includeSubdomains`.
fn hsts_field(field: &str) -> Option<String> {
    let rest = field.strip_prefix(HSTS_PREFIX)?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}

#[cfg(test)]
mod tests {
    use rest_tree::Folder;
    use serde_json::json;

    use super::{convert, hsts_field};
    use crate::convert::test_support::{body, config, context, get};
    use crate::intermediate::Application;
    use crate::version::DeviceVersion;

    fn profile(
        version: Option<DeviceVersion>,
        declared: serde_json::Value,
    ) -> rest_tree::Body {
        let mut config = config();
        config.device_version = version;
        let app = Application::default();
        let cx = context(&config, &app);
        let mut out = Folder::default();
        convert(&cx, "web", &body(declared), &mut out).expect("convert");
        get(&out, "ltm/profile/http/web").clone()
    }

    #[test]
    fn chunking_coalesces_on_v15() {
        let declared = json!({"responseChunking": "selective", "requestChunking": "rechunk"});
        let v15 = profile(Some(DeviceVersion::new(15, 1, 0)), declared.clone());
        assert_eq!(v15["responseChunking"], json!("sustain"));
        assert_eq!(v15["requestChunking"], json!("rechunk"));

        let v14 = profile(Some(DeviceVersion::new(14, 1, 0)), declared.clone());
        assert_eq!(v14["responseChunking"], json!("selective"));

        let unknown = profile(None, declared);
        assert_eq!(unknown["responseChunking"], json!("selective"));
    }

    #[test]
    fn insert_header_collapses() {
        let http = profile(
            None,
            json!({"insertHeader": {"name": "X-Forwarded-Proto", "value": "https"}}),
        );
        assert_eq!(http["headerInsert"], json!("X-Forwarded-Proto: https"));
    }

    #[test]
    fn hsts_fields_nest_under_sub_object() {
        let http = profile(
            None,
            json!({"hstsInsert": true, "hstsPeriod": 7_862_400, "hstsIncludeSubdomains": false}),
        );
        assert_eq!(
            http["hsts"],
            json!({"mode": "enabled", "maximumAge": 7_862_400, "includeSubdomains": "disabled"})
        );
        assert!(http.get("hstsInsert").is_none());
    }

    #[test]
    fn no_hsts_fields_means_no_sub_object() {
        let http = profile(None, json!({"xForwardedFor": true}));
        assert_eq!(http["insertXforwardedFor"], json!("enabled"));
        assert!(http.get("hsts").is_none());
    }

    #[test]
    fn hsts_preload_is_version_gated() {
        let http = profile(Some(DeviceVersion::new(14, 1, 0)), json!({"hstsPreload": true, "hstsInsert": true}));
        assert_eq!(http["hsts"], json!({"mode": "enabled"}));
    }

    #[test]
    fn hsts_field_names() {
        assert_eq!(hsts_field("hstsPeriod").as_deref(), Some("period"));
        assert_eq!(hsts_field("hsts"), None);
        assert_eq!(hsts_field("insertHeader"), None);
    }
}
