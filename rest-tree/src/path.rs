use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error returned when a string is not a valid resource path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid resource path '{0}': expected <namespace>/<name>")]
pub struct PathError(pub String);

/// A device resource path such as `ltm/virtual/app_vs` or `ltm/monitor/http/mon`.
///
/// The path is split into a `kind` (every segment but the last) and a `name`
/// (the last segment). Partition and subfolder are never part of a path; they
/// are carried by the enclosing [`crate::ObjectSet`] nesting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourcePath {
    kind: String,
    name: String,
}

impl ResourcePath {
    /// Build a path from a kind (`ltm/pool`, `ltm/profile/http`) and a name.
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Everything before the final segment.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The final segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The first two segments of the kind, e.g. `ltm/profile` for
    /// `ltm/profile/client-ssl/x`. Single-segment kinds return themselves.
    pub fn namespace(&self) -> &str {
        match self.kind.match_indices('/').nth(1) {
            Some((idx, _)) => &self.kind[..idx],
            None => &self.kind,
        }
    }

    /// The segment after the namespace, if the kind has one
    /// (`client-ssl` for `ltm/profile/client-ssl/x`).
    pub fn subtype(&self) -> Option<&str> {
        let ns = self.namespace();
        self.kind
            .strip_prefix(ns)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
    }

    /// True when the path's kind equals `kind` or is nested below it.
    pub fn is_under(&self, kind: &str) -> bool {
        self.kind == kind
            || self
                .kind
                .strip_prefix(kind)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Return a copy of this path with a different name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self::new(self.kind.clone(), name)
    }
}

impl Display for ResourcePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

impl FromStr for ResourcePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('/') {
            Some((kind, name)) if !kind.is_empty() && !name.is_empty() => {
                Ok(Self::new(kind, name))
            }
            _ => Err(PathError(s.to_string())),
        }
    }
}

impl Serialize for ResourcePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
