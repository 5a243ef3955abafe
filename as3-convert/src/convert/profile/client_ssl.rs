//! `TLS_Server` → one `ltm/profile/client-ssl` per certificate.
//!
//! The first object keeps the declared name and is the SNI default; the
//! rest are `<name>-<i>-`. Only the first is referenced by virtuals at this
//! point; the reconciler attaches the siblings.

use rest_tree::{Body, Folder, ResourcePath};
use serde_json::Value;

use super::{authentication_frequency, tls_reference, CertificateRefs};
use crate::convert::{indexed_name, reference_name, AppContext, TargetBuilder};
use crate::error::ConvertError;

const KIND: &str = "ltm/profile/client-ssl";

pub(super) fn convert(
    cx: &AppContext<'_>,
    name: &str,
    body: &Body,
    out: &mut Folder,
) -> Result<(), ConvertError> {
    let mut shared = TargetBuilder::nameless(cx, KIND);
    let mut certificates: &[Value] = &[];

    for (field, value) in body {
        match field.as_str() {
            "class" => {}
            "certificates" => {
                certificates = value.as_array().map(Vec::as_slice).ok_or_else(|| {
                    ConvertError::malformed(name, "certificates must be an array")
                })?;
            }
            "authenticationFrequency" => shared.renamed(field, authentication_frequency(value)),
            "authenticationTrustCA" => shared.set("caFile", trust_ca(cx, name, value)?),
            _ => shared.field(field, value)?,
        }
    }
    if certificates.is_empty() {
        return Err(ConvertError::missing(KIND, name, "certificates"));
    }
    let shared = shared.finish();

    for (index, item) in certificates.iter().enumerate() {
        let object_name = indexed_name(index, name);
        let certificate = item
            .get("certificate")
            .and_then(Value::as_str)
            .ok_or_else(|| ConvertError::missing(KIND, name, "certificates[].certificate"))?;

        let mut profile = TargetBuilder::new(cx, KIND, &object_name);
        profile.set("sniDefault", if index == 0 { "true" } else { "false" });
        profile.set(
            "serverName",
            item.get("matchToSNI")
                .and_then(Value::as_str)
                .unwrap_or("none"),
        );
        CertificateRefs::resolve(cx, name, certificate)?.apply(&mut profile);

        let mut target = profile.finish();
        target.extend(shared.clone());
        out.insert(ResourcePath::new(KIND, object_name), target);
    }
    Ok(())
}

/// `{bigip}` device bundle, or the name of a CA_Bundle in this application.
fn trust_ca(cx: &AppContext<'_>, owner: &str, value: &Value) -> Result<String, ConvertError> {
    match value {
        Value::String(bundle_ref) => {
            let bundle_name = reference_name(bundle_ref);
            let bundle = cx
                .app
                .ca_bundle(bundle_name)
                .and_then(|bundle| bundle.get("bundle"))
                .ok_or_else(|| {
                    ConvertError::malformed(
                        owner,
                        format!("authenticationTrustCA references unknown CA_Bundle '{bundle_ref}'"),
                    )
                })?;
            tls_reference(cx, owner, bundle_name, bundle)
        }
        other => tls_reference(cx, owner, "authenticationTrustCA", other),
    }
}
