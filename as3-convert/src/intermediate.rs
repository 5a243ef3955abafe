//! The parser's output: declaration nodes filed by resource path, nested
//! per tenant and application.

use std::collections::BTreeMap;

use rest_tree::{Body, ResourcePath};
use serde::Serialize;

use crate::class::{ProfileKind, ServiceKind};
use crate::files::{SslFile, Upload, UPLOADS_KIND};

/// One classified declaration node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "entry", rename_all = "kebab-case")]
pub enum Entry {
    Virtual { service: ServiceKind, body: Body },
    Pool { body: Body },
    Monitor { monitor_type: String, body: Body },
    Persistence { method: String, body: Body },
    Profile { profile: ProfileKind, body: Body },
    Rule { body: Body },
    SnatPool { body: Body },
    ServiceAddress { body: Body },
    /// Lookup-only; consumed by TLS profile conversion.
    Certificate { body: Body },
    /// Lookup-only; consumed by TLS profile conversion.
    CaBundle { body: Body },
    SslFile(SslFile),
    Upload(Upload),
}

impl Entry {
    /// The resource kind this entry is filed under.
    pub fn kind(&self) -> String {
        match self {
            Self::Virtual { .. } => "ltm/virtual".to_string(),
            Self::Pool { .. } => "ltm/pool".to_string(),
            Self::Monitor { monitor_type, .. } => format!("ltm/monitor/{monitor_type}"),
            Self::Persistence { method, .. } => format!("ltm/persistence/{method}"),
            Self::Profile { profile, .. } => profile.resource_kind(),
            Self::Rule { .. } => "ltm/rule".to_string(),
            Self::SnatPool { .. } => "ltm/snatpool".to_string(),
            Self::ServiceAddress { .. } => "ltm/virtual-address".to_string(),
            Self::Certificate { .. } => "certificate".to_string(),
            Self::CaBundle { .. } => "ca-bundle".to_string(),
            Self::SslFile(file) => file.store.kind().to_string(),
            Self::Upload(_) => UPLOADS_KIND.to_string(),
        }
    }
}

/// Entries of one application (the future subfolder).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Application {
    pub entries: BTreeMap<ResourcePath, Entry>,
}

impl Application {
    /// File `entry` under `<kind>/<name>`, replacing any previous entry.
    pub fn insert(&mut self, name: &str, entry: Entry) -> ResourcePath {
        let path = ResourcePath::new(entry.kind(), name);
        self.entries.insert(path.clone(), entry);
        path
    }

    pub fn get(&self, path: &ResourcePath) -> Option<&Entry> {
        self.entries.get(path)
    }

    /// The Certificate node declared as `name`.
    pub fn certificate(&self, name: &str) -> Option<&Body> {
        match self.get(&ResourcePath::new("certificate", name)) {
            Some(Entry::Certificate { body }) => Some(body),
            _ => None,
        }
    }

    /// The CA_Bundle node declared as `name`.
    pub fn ca_bundle(&self, name: &str) -> Option<&Body> {
        match self.get(&ResourcePath::new("ca-bundle", name)) {
            Some(Entry::CaBundle { body }) => Some(body),
            _ => None,
        }
    }

    /// The Service_Address node declared as `name`.
    pub fn service_address(&self, name: &str) -> Option<&Body> {
        match self.get(&ResourcePath::new("ltm/virtual-address", name)) {
            Some(Entry::ServiceAddress { body }) => Some(body),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Applications of one tenant (the future partition).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tenant {
    pub applications: BTreeMap<String, Application>,
}

/// Every classified node of one declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IntermediateSet {
    pub tenants: BTreeMap<String, Tenant>,
}

impl IntermediateSet {
    pub fn application(&self, tenant: &str, application: &str) -> Option<&Application> {
        self.tenants.get(tenant)?.applications.get(application)
    }

    /// Walk `(tenant, application, entries)` in sorted order.
    pub fn applications(&self) -> impl Iterator<Item = (&str, &str, &Application)> {
        self.tenants.iter().flat_map(|(tenant, t)| {
            t.applications
                .iter()
                .map(move |(app, a)| (tenant.as_str(), app.as_str(), a))
        })
    }

    /// Total entries across all applications.
    pub fn len(&self) -> usize {
        self.applications().map(|(_, _, app)| app.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
