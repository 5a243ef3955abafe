//! `ltm/profile/*` conversion.

mod client_ssl;
mod http;
mod server_ssl;
mod tcp;

use rest_tree::{Body, Folder, ResourcePath};
use serde_json::Value;

use super::{reference_name, AppContext, TargetBuilder};
use crate::class::ProfileKind;
use crate::error::ConvertError;
use crate::secret::decode_secret;

pub(super) fn convert(
    cx: &AppContext<'_>,
    profile: ProfileKind,
    name: &str,
    body: &Body,
    out: &mut Folder,
) -> Result<(), ConvertError> {
    match profile {
        ProfileKind::Http => http::convert(cx, name, body, out),
        ProfileKind::Tcp => tcp::convert(cx, name, body, out),
        ProfileKind::ClientSsl => client_ssl::convert(cx, name, body, out),
        ProfileKind::ServerSsl => server_ssl::convert(cx, name, body, out),
        ProfileKind::Udp | ProfileKind::Ftp | ProfileKind::OneConnect | ProfileKind::FastL4 => {
            convert_common(cx, profile, name, body, out)
        }
    }
}

/// Generic rule only.
fn convert_common(
    cx: &AppContext<'_>,
    profile: ProfileKind,
    name: &str,
    body: &Body,
    out: &mut Folder,
) -> Result<(), ConvertError> {
    let kind = profile.resource_kind();
    let mut target = TargetBuilder::new(cx, kind.as_str(), name);
    for (field, value) in body {
        if field != "class" {
            target.field(field, value)?;
        }
    }
    out.insert(ResourcePath::new(kind, name), target.finish());
    Ok(())
}

/// `one-time` → `once`, `every-time` → `always`.
fn authentication_frequency(value: &Value) -> Value {
    match value.as_str() {
        Some("one-time") => Value::String("once".to_string()),
        Some("every-time") => Value::String("always".to_string()),
        _ => value.clone(),
    }
}

/// The device paths a Certificate contributes to a TLS profile.
#[derive(Debug, Default, PartialEq)]
struct CertificateRefs {
    cert: Option<String>,
    key: Option<String>,
    chain: Option<String>,
    passphrase: Option<String>,
}

impl CertificateRefs {
    /// Resolve the Certificate `reference` declared in this application.
    fn resolve(cx: &AppContext<'_>, owner: &str, reference: &str) -> Result<Self, ConvertError> {
        let name = reference_name(reference);
        let certificate = cx.app.certificate(name).ok_or_else(|| {
            ConvertError::malformed(owner, format!("references unknown Certificate '{reference}'"))
        })?;

        let payload = |field: &str, file: String| -> Result<Option<String>, ConvertError> {
            certificate
                .get(field)
                .map(|value| tls_reference(cx, owner, &file, value))
                .transpose()
        };
        let passphrase = certificate
            .get("passphrase")
            .map(|value| decode_secret(&format!("{name}.passphrase"), value))
            .transpose()?;

        Ok(Self {
            cert: payload("certificate", format!("{name}.crt"))?,
            key: payload("privateKey", format!("{name}.key"))?,
            chain: payload("chainCA", format!("{name}-bundle.crt"))?,
            passphrase,
        })
    }

    fn apply(self, target: &mut TargetBuilder<'_>) {
        let fields = [
            ("cert", self.cert),
            ("key", self.key),
            ("chain", self.chain),
            ("passphrase", self.passphrase),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                target.set(field, value);
            }
        }
    }
}

/// Where a TLS payload lives on the device.
///
/// Literal content was uploaded as `file` in this folder; `{bigip}` is
/// already a device path; `{use}` names another object in this folder.
fn tls_reference(
    cx: &AppContext<'_>,
    owner: &str,
    file: &str,
    payload: &Value,
) -> Result<String, ConvertError> {
    match payload {
        Value::String(_) => Ok(cx.local_path(file)),
        Value::Object(wrapper) => {
            if let Some(path) = wrapper.get("bigip").and_then(Value::as_str) {
                Ok(path.to_string())
            } else if let Some(local) = wrapper.get("use").and_then(Value::as_str) {
                Ok(cx.local_path(local))
            } else {
                Err(ConvertError::malformed(
                    owner,
                    format!("payload for '{file}' needs 'bigip' or 'use'"),
                ))
            }
        }
        other => Err(ConvertError::malformed(
            owner,
            format!(
                "payload for '{file}' has unsupported type {}",
                rest_tree::value_kind(other)
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use rest_tree::Folder;
    use serde_json::json;

    use super::convert;
    use crate::class::ProfileKind;
    use crate::convert::test_support::{body, config, context, get};
    use crate::intermediate::Application;

    #[test]
    fn common_profiles_use_generic_rule() {
        let config = config();
        let app = Application::default();
        let cx = context(&config, &app);
        let mut out = Folder::default();
        convert(
            &cx,
            ProfileKind::OneConnect,
            "mux",
            &body(json!({"class": "Multiplex_Profile", "remark": "pooling"})),
            &mut out,
        )
        .expect("convert");
        assert_eq!(
            get(&out, "ltm/profile/one-connect/mux"),
            &body(json!({"name": "mux", "description": "pooling"}))
        );
    }
}
