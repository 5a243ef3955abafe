use rest_tree::{Body, Folder, ResourcePath};
use serde_json::Value;

use super::{authentication_frequency, CertificateRefs};
use crate::convert::{reference, AppContext, TargetBuilder};
use crate::error::ConvertError;

const KIND: &str = "ltm/profile/server-ssl";
const GENERIC_CA_BUNDLE: &str = "/Common/ca-bundle.crt";

pub(super) fn convert(
    cx: &AppContext<'_>,
    name: &str,
    body: &Body,
    out: &mut Folder,
) -> Result<(), ConvertError> {
    let mut profile = TargetBuilder::new(cx, KIND, name);
    profile.set("caFile", GENERIC_CA_BUNDLE);

    for (field, value) in body {
        match field.as_str() {
            "class" => {}
            "trustCA" => profile.set("caFile", trust_ca(name, value)?),
            "clientCertificate" => {
                let certificate = value.as_str().ok_or_else(|| {
                    ConvertError::malformed(name, "clientCertificate must name a Certificate")
                })?;
                CertificateRefs::resolve(cx, name, certificate)?.apply(&mut profile);
            }
            "authenticationFrequency" => profile.renamed(field, authentication_frequency(value)),
            _ => profile.field(field, value)?,
        }
    }
    out.insert(ResourcePath::new(KIND, name), profile.finish());
    Ok(())
}

fn trust_ca(owner: &str, value: &Value) -> Result<String, ConvertError> {
    match value {
        Value::String(token) if token == "generic" => Ok(GENERIC_CA_BUNDLE.to_string()),
        Value::Object(_) => reference(value).ok_or_else(|| {
            ConvertError::malformed(owner, "trustCA object needs 'bigip' or 'use'")
        }),
        _ => Err(ConvertError::malformed(
            owner,
            "trustCA must be 'generic' or a reference",
        )),
    }
}

#[cfg(test)]
mod tests {
    use rest_tree::Folder;
    use serde_json::json;

    use super::convert;
    use crate::convert::test_support::{body, config, context, get};
    use crate::error::ConvertError;
    use crate::intermediate::{Application, Entry};

    #[test]
    fn defaults_ca_and_resolves_client_certificate() {
        let config = config();
        let mut app = Application::default();
        app.insert(
            "mtls",
            Entry::Certificate {
                body: body(json!({"certificate": "PEM", "privateKey": "KEY"})),
            },
        );
        let cx = context(&config, &app);
        let mut out = Folder::default();
        convert(
            &cx,
            "backend",
            &body(json!({
                "class": "TLS_Client",
                "clientCertificate": "mtls",
                "authenticationFrequency": "every-time"
            })),
            &mut out,
        )
        .expect("convert");
        let profile = get(&out, "ltm/profile/server-ssl/backend");
        assert_eq!(profile["caFile"], json!("/Common/ca-bundle.crt"));
        assert_eq!(profile["cert"], json!("/T1/A1/mtls.crt"));
        assert_eq!(profile["key"], json!("/T1/A1/mtls.key"));
        assert_eq!(profile["authenticate"], json!("always"));
    }

    #[test]
    fn trust_ca_forms() {
        let config = config();
        let app = Application::default();
        let cx = context(&config, &app);
        let mut out = Folder::default();
        convert(
            &cx,
            "b",
            &body(json!({"trustCA": {"bigip": "/Common/internal.crt"}})),
            &mut out,
        )
        .expect("convert");
        assert_eq!(
            get(&out, "ltm/profile/server-ssl/b")["caFile"],
            json!("/Common/internal.crt")
        );

        let err = convert(&cx, "b", &body(json!({"trustCA": "custom"})), &mut out)
            .expect_err("non-generic string");
        assert!(matches!(err, ConvertError::MalformedDeclaration { .. }));
    }
}
