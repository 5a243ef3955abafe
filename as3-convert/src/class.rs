//! Closed models of the declaration discriminators (`class`) and of the
//! device profile kinds they map to.

use std::fmt::{self, Display, Formatter};

use serde::{Serialize, Serializer};

/// Virtual service flavours (`Service_<X>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Generic,
    Http,
    L4,
    Https,
    Sctp,
    Tcp,
    Udp,
    Forwarding,
}

impl ServiceKind {
    fn from_suffix(suffix: &str) -> Option<Self> {
        let kind = match suffix {
            "Generic" => Self::Generic,
            "HTTP" => Self::Http,
            "L4" => Self::L4,
            "HTTPS" => Self::Https,
            "SCTP" => Self::Sctp,
            "TCP" => Self::Tcp,
            "UDP" => Self::Udp,
            "Forwarding" => Self::Forwarding,
            _ => return None,
        };
        Some(kind)
    }

    /// The IP protocol a virtual of this flavour carries unless `layer4`
    /// says otherwise.
    pub fn default_ip_protocol(self) -> &'static str {
        match self {
            Self::Http | Self::L4 | Self::Https => "tcp",
            Self::Udp => "udp",
            Self::Generic | Self::Sctp | Self::Tcp | Self::Forwarding => "any",
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Self::Generic => "Service_Generic",
            Self::Http => "Service_HTTP",
            Self::L4 => "Service_L4",
            Self::Https => "Service_HTTPS",
            Self::Sctp => "Service_SCTP",
            Self::Tcp => "Service_TCP",
            Self::Udp => "Service_UDP",
            Self::Forwarding => "Service_Forwarding",
        }
    }
}

/// Device profile kinds the converter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    Http,
    Tcp,
    Udp,
    Ftp,
    OneConnect,
    FastL4,
    ClientSsl,
    ServerSsl,
}

impl ProfileKind {
    /// The device subtype segment, e.g. `client-ssl`.
    pub fn subtype(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Ftp => "ftp",
            Self::OneConnect => "one-connect",
            Self::FastL4 => "fastl4",
            Self::ClientSsl => "client-ssl",
            Self::ServerSsl => "server-ssl",
        }
    }

    pub fn from_subtype(subtype: &str) -> Option<Self> {
        let kind = match subtype {
            "http" => Self::Http,
            "tcp" => Self::Tcp,
            "udp" => Self::Udp,
            "ftp" => Self::Ftp,
            "one-connect" => Self::OneConnect,
            "fastl4" => Self::FastL4,
            "client-ssl" => Self::ClientSsl,
            "server-ssl" => Self::ServerSsl,
            _ => return None,
        };
        Some(kind)
    }

    /// The resource kind, e.g. `ltm/profile/http`.
    pub fn resource_kind(self) -> String {
        format!("ltm/profile/{}", self.subtype())
    }
}

impl Serialize for ServiceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.class_name())
    }
}

impl Serialize for ProfileKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.subtype())
    }
}

impl Display for ProfileKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.subtype())
    }
}

/// How a profile class resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileClass {
    /// A kind the converter handles.
    Known(ProfileKind),
    /// A well-formed `<X>_Profile` class naming an unsupported subtype; the
    /// payload is the lower-cased subtype.
    Unsupported(String),
}

/// Every discriminator a declaration may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceClass {
    As3,
    Adc,
    Controls,
    Tenant,
    Application,
    Pool,
    Monitor,
    Persist,
    IRule,
    SnatPool,
    ServiceAddress,
    Certificate,
    CaBundle,
    Service(ServiceKind),
    Profile(ProfileClass),
}

impl SourceClass {
    /// Classify a discriminator. Returns `None` for anything unrecognized.
    pub fn parse(class: &str) -> Option<Self> {
        let parsed = match class {
            "AS3" => Self::As3,
            "ADC" => Self::Adc,
            "Controls" => Self::Controls,
            "Tenant" => Self::Tenant,
            "Application" => Self::Application,
            "Pool" => Self::Pool,
            "Monitor" => Self::Monitor,
            "Persist" => Self::Persist,
            "iRule" => Self::IRule,
            "SNAT_Pool" => Self::SnatPool,
            "Service_Address" => Self::ServiceAddress,
            "Certificate" => Self::Certificate,
            "CA_Bundle" => Self::CaBundle,
            "TLS_Server" => Self::Profile(ProfileClass::Known(ProfileKind::ClientSsl)),
            "TLS_Client" => Self::Profile(ProfileClass::Known(ProfileKind::ServerSsl)),
            "Multiplex_Profile" => Self::Profile(ProfileClass::Known(ProfileKind::OneConnect)),
            "L4_Profile" => Self::Profile(ProfileClass::Known(ProfileKind::FastL4)),
            other => {
                if let Some(suffix) = other.strip_prefix("Service_") {
                    return ServiceKind::from_suffix(suffix).map(Self::Service);
                }
                return generic_profile(other).map(Self::Profile);
            }
        };
        Some(parsed)
    }
}

/// `<X>_Profile` where `X` has no underscore or whitespace → lower-cased `x`.
fn generic_profile(class: &str) -> Option<ProfileClass> {
    let prefix = class.strip_suffix("_Profile")?;
    if prefix.is_empty() || prefix.contains(|c: char| c == '_' || c.is_whitespace()) {
        return None;
    }
    let subtype = prefix.to_lowercase();
    Some(match ProfileKind::from_subtype(&subtype) {
        Some(kind) => ProfileClass::Known(kind),
        None => ProfileClass::Unsupported(subtype),
    })
}
