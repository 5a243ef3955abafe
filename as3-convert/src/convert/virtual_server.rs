//! `Service_*` → one `ltm/virtual` per address, plus redirect companions,
//! self-SNAT pools and default virtual-addresses.

use rest_tree::{Body, Folder, ResourcePath};
use serde_json::{json, Value};

use super::{indexed_name, reference, reference_name, AppContext, TargetBuilder};
use crate::class::ServiceKind;
use crate::error::ConvertError;

const KIND: &str = "ltm/virtual";

const CANNED_TCP: &str = "/Common/f5-tcp-progressive";
const CANNED_HTTP: &str = "/Common/http";
const CANNED_FASTL4: &str = "/Common/fastL4";
const REDIRECT_RULE: &str = "/Common/_sys_https_redirect";
const REDIRECT_PORT: u16 = 80;

#[derive(Debug, Clone, PartialEq)]
enum Snat {
    None,
    Automap,
    SelfPool,
    Pool(String),
}

impl Snat {
    fn parse(name: &str, value: &Value) -> Result<Self, ConvertError> {
        match value {
            Value::String(token) => Ok(match token.as_str() {
                "none" => Self::None,
                "auto" => Self::Automap,
                "self" => Self::SelfPool,
                other => Self::Pool(other.to_string()),
            }),
            Value::Object(_) => reference(value)
                .map(Self::Pool)
                .ok_or_else(|| ConvertError::malformed(name, "snat object needs 'use' or 'bigip'")),
            _ => Err(ConvertError::malformed(name, "snat must be a string or reference")),
        }
    }

    /// `sourceAddressTranslation` for the virtual named `virtual_name`.
    fn translation(&self, virtual_name: &str) -> Value {
        match self {
            Self::None => json!({"type": "none"}),
            Self::Automap => json!({"type": "automap"}),
            Self::SelfPool => json!({"type": "snat", "pool": self_pool_name(virtual_name)}),
            Self::Pool(pool) => json!({"type": "snat", "pool": pool}),
        }
    }
}

fn self_pool_name(virtual_name: &str) -> String {
    format!("{virtual_name}-self")
}

pub(super) fn convert(
    cx: &AppContext<'_>,
    name: &str,
    service: ServiceKind,
    body: &Body,
    out: &mut Folder,
) -> Result<(), ConvertError> {
    let port = body
        .get("virtualPort")
        .filter(|port| port.is_number() || port.is_string())
        .map(port_text)
        .ok_or_else(|| ConvertError::missing(KIND, name, "virtualPort"))?;
    let addresses = addresses(cx, name, body)?;

    let mut base = TargetBuilder::new(cx, KIND, name);
    base.set("description", cx.subfolder);
    base.set("ipProtocol", service.default_ip_protocol());

    let mut profiles: Vec<String> = Vec::new();
    let mut snat = None;
    let mut redirect80 = false;

    for (field, value) in body {
        match field.as_str() {
            "class" | "virtualPort" | "virtualAddresses" => {}
            "layer4" => base.set("ipProtocol", value.clone()),
            "persistenceMethods" => {
                let mut persist: Vec<String> = list(value)
                    .iter()
                    .filter_map(reference)
                    .map(|method| persist_profile(&method).to_string())
                    .collect();
                persist.sort();
                base.set("persist", name_list(&persist));
            }
            "profileTCP" => profiles.extend(canned_or_reference(value, "normal", CANNED_TCP)),
            "profileHTTP" => profiles.extend(canned_or_reference(value, "basic", CANNED_HTTP)),
            "profileL4" => profiles.extend(canned_or_reference(value, "basic", CANNED_FASTL4)),
            "profileMultiplex" | "profileFTP" | "profileUDP" => {
                profiles.extend(reference(value))
            }
            "serverTLS" | "clientTLS" => profiles.extend(list(value).iter().filter_map(reference)),
            "snat" => snat = Some(Snat::parse(name, value)?),
            "mirroring" => match value.as_str() {
                Some("none") => base.renamed(field, json!("disabled")),
                Some("L4") => base.renamed(field, json!("enabled")),
                _ => base.field(field, value)?,
            },
            "redirect80" => {
                redirect80 = value.as_bool().ok_or_else(|| {
                    ConvertError::malformed(name, "redirect80 must be a boolean")
                })?
            }
            "iRules" => {
                let rules: Vec<Value> = list(value)
                    .iter()
                    .filter_map(reference)
                    .map(Value::String)
                    .collect();
                base.renamed(field, Value::Array(rules));
            }
            _ if is_inline_declaration(value) => {}
            _ => base.field(field, value)?,
        }
    }

    if !base.contains("pool") {
        base.set("pool", "");
    }
    profiles.sort();
    base.set("profiles", name_list(&profiles));
    let base = base.finish();

    for (index, address) in addresses.iter().enumerate() {
        let virtual_name = indexed_name(index, name);
        let mut primary = base.clone();
        primary.insert("name".to_string(), json!(virtual_name));
        primary.insert("destination".to_string(), json!(destination(address, &port)));
        if let Some(snat) = &snat {
            primary.insert(
                "sourceAddressTranslation".to_string(),
                snat.translation(&virtual_name),
            );
            if *snat == Snat::SelfPool {
                let pool = self_pool_name(&virtual_name);
                out.insert(
                    ResourcePath::new("ltm/snatpool", pool.as_str()),
                    body_of(json!({"name": pool, "members": [address]})),
                );
            }
        }

        if redirect80 {
            let redirect_name = indexed_name(index, &format!("{name}-Redirect-"));
            let mut redirect = primary.clone();
            redirect.insert("name".to_string(), json!(redirect_name));
            redirect.insert(
                "destination".to_string(),
                json!(destination(address, &REDIRECT_PORT.to_string())),
            );
            redirect.insert("rules".to_string(), json!([REDIRECT_RULE]));
            redirect.insert(
                "profiles".to_string(),
                json!([{"name": CANNED_TCP}, {"name": CANNED_HTTP}]),
            );
            redirect.insert("persist".to_string(), json!([]));
            redirect.remove("pool");
            out.insert(ResourcePath::new(KIND, redirect_name), redirect);
        }

        out.insert(ResourcePath::new(KIND, virtual_name), primary);
    }

    for address in &addresses {
        out.insert_if_absent(
            ResourcePath::new("ltm/virtual-address", address.as_str()),
            body_of(json!({"name": address, "address": address, "arp": "enabled"})),
        );
    }
    Ok(())
}

/// Resolve `virtualAddresses` to literal addresses.
fn addresses(cx: &AppContext<'_>, name: &str, body: &Body) -> Result<Vec<String>, ConvertError> {
    let Some(Value::Array(items)) = body.get("virtualAddresses") else {
        return Err(ConvertError::missing(KIND, name, "virtualAddresses"));
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(address) => Ok(address.clone()),
            Value::Object(wrapper) => {
                let target = wrapper.get("use").and_then(Value::as_str).ok_or_else(|| {
                    ConvertError::malformed(name, "virtualAddresses object needs 'use'")
                })?;
                cx.app
                    .service_address(reference_name(target))
                    .and_then(|sa| sa.get("virtualAddress"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        ConvertError::malformed(
                            name,
                            format!("virtualAddresses references unknown Service_Address '{target}'"),
                        )
                    })
            }
            other => Err(ConvertError::malformed(
                name,
                format!(
                    "virtualAddresses entry of type {} is not supported",
                    rest_tree::value_kind(other)
                ),
            )),
        })
        .collect()
}

/// `addr:port`, or `addr.port` for IPv6 literals.
fn destination(address: &str, port: &str) -> String {
    if address.contains(':') {
        format!("{address}.{port}")
    } else {
        format!("{address}:{port}")
    }
}

fn port_text(port: &Value) -> String {
    match port {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn persist_profile(method: &str) -> &str {
    match method {
        "destination-address" => "dest_addr",
        "tls-session-id" => "ssl",
        "sip-info" => "sip_info",
        "source-address" => "source_addr",
        other => other,
    }
}

fn canned_or_reference(value: &Value, shorthand: &str, canned: &str) -> Option<String> {
    match value {
        Value::String(token) if token == shorthand => Some(canned.to_string()),
        other => reference(other),
    }
}

/// A field value that is itself a classified declaration node.
fn is_inline_declaration(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|node| node.contains_key("class"))
}

fn list(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

fn name_list(names: &[String]) -> Value {
    Value::Array(names.iter().map(|name| json!({ "name": name })).collect())
}

fn body_of(value: Value) -> Body {
    match value {
        Value::Object(body) => body,
        _ => Body::new(),
    }
}
