//! Whole-graph corrections that need every target object to exist.

use std::collections::{BTreeMap, BTreeSet};

use rest_tree::{Body, ObjectSet, ResourcePath};
use serde_json::{json, Value};
use tracing::debug;

const VIRTUAL_KIND: &str = "ltm/virtual";
const VIRTUAL_ADDRESS_KIND: &str = "ltm/virtual-address";
const CLIENT_SSL_KIND: &str = "ltm/profile/client-ssl";

/// The partition folder that owns partition-unique objects.
pub const CANONICAL_FOLDER: &str = "";

/// Run every pass, in order.
pub fn reconcile(set: &mut ObjectSet) {
    consolidate_virtual_addresses(set);
    attach_sni_profiles(set);
}

/// Move every virtual-address into its partition's canonical folder.
///
/// Folders are visited in sorted order (the canonical folder first) and
/// bodies merge field-wise, so the last writer wins per field.
pub fn consolidate_virtual_addresses(set: &mut ObjectSet) {
    for (partition_name, partition) in &mut set.partitions {
        let mut merged: BTreeMap<ResourcePath, Body> = BTreeMap::new();
        for folder in partition.folders.values_mut() {
            let paths: Vec<ResourcePath> = folder
                .resources_under(VIRTUAL_ADDRESS_KIND)
                .map(|(path, _)| path.clone())
                .collect();
            for path in paths {
                if let Some(body) = folder.resources.remove(&path) {
                    merged.entry(path).or_default().extend(body);
                }
            }
        }
        if merged.is_empty() {
            continue;
        }
        debug!(
            partition = %partition_name,
            addresses = merged.len(),
            "consolidated virtual addresses"
        );
        let canonical = partition.folder_mut(CANONICAL_FOLDER);
        for (path, body) in merged {
            canonical.insert(path, body);
        }
    }
}

/// A client-ssl object's location: partition, folder, name.
type ProfileKey = (String, String, String);

/// Attach every `<name>-<i>-` client-ssl sibling to the virtuals that
/// reference `<name>`.
pub fn attach_sni_profiles(set: &mut ObjectSet) {
    let client_ssl: BTreeSet<ProfileKey> = set
        .iter()
        .filter(|located| located.path.kind() == CLIENT_SSL_KIND)
        .map(|located| {
            (
                located.partition.to_string(),
                located.folder.to_string(),
                located.path.name().to_string(),
            )
        })
        .collect();
    if client_ssl.is_empty() {
        return;
    }

    for (partition_name, partition) in &mut set.partitions {
        for (folder_name, folder) in &mut partition.folders {
            for (path, body) in folder.resources.iter_mut() {
                if path.kind() != VIRTUAL_KIND {
                    continue;
                }
                let Some(Value::Array(profiles)) = body.get_mut("profiles") else {
                    continue;
                };
                let expanded = expand_profiles(profiles, partition_name, folder_name, &client_ssl);
                if expanded.len() != profiles.len() {
                    debug!(
                        virtual_server = %path.name(),
                        attached = expanded.len() - profiles.len(),
                        "attached SNI profiles"
                    );
                    *profiles = expanded;
                }
            }
        }
    }
}

fn expand_profiles(
    profiles: &[Value],
    partition: &str,
    folder: &str,
    client_ssl: &BTreeSet<ProfileKey>,
) -> Vec<Value> {
    let mut seen: BTreeSet<String> = profiles.iter().filter_map(profile_name).collect();
    let mut expanded = Vec::with_capacity(profiles.len());
    for profile in profiles {
        expanded.push(profile.clone());
        let Some(reference) = profile_name(profile) else {
            continue;
        };
        let target = ProfileRef::parse(&reference, partition, folder);
        if !client_ssl.contains(&target.key()) {
            continue;
        }
        for sibling in siblings(&target, client_ssl) {
            let sibling_ref = target.render(&sibling);
            if seen.insert(sibling_ref.clone()) {
                expanded.push(json!({ "name": sibling_ref }));
            }
        }
    }
    expanded
}

fn profile_name(profile: &Value) -> Option<String> {
    profile.get("name").and_then(Value::as_str).map(str::to_string)
}

/// How a virtual spells a profile reference.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Form {
    /// `name`, resolved against the virtual's folder.
    Relative,
    /// `/P/A/name`
    Folder,
    /// `/P/name`
    Partition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProfileRef {
    partition: String,
    folder: String,
    name: String,
    form: Form,
}

impl ProfileRef {
    fn parse(reference: &str, partition: &str, folder: &str) -> Self {
        let segments: Vec<&str> = reference.split('/').collect();
        match segments.as_slice() {
            ["", p, a, name] => Self {
                partition: (*p).to_string(),
                folder: (*a).to_string(),
                name: (*name).to_string(),
                form: Form::Folder,
            },
            ["", p, name] => Self {
                partition: (*p).to_string(),
                folder: CANONICAL_FOLDER.to_string(),
                name: (*name).to_string(),
                form: Form::Partition,
            },
            _ => Self {
                partition: partition.to_string(),
                folder: folder.to_string(),
                name: reference.to_string(),
                form: Form::Relative,
            },
        }
    }

    fn key(&self) -> ProfileKey {
        (
            self.partition.clone(),
            self.folder.clone(),
            self.name.clone(),
        )
    }

    /// Spell `name` in the same form as this reference.
    fn render(&self, name: &str) -> String {
        match self.form {
            Form::Relative => name.to_string(),
            Form::Folder => format!("/{}/{}/{}", self.partition, self.folder, name),
            Form::Partition => format!("/{}/{}", self.partition, name),
        }
    }
}

/// Names of `<base>-<digits>-` client-ssl objects next to `target`, by index.
fn siblings(target: &ProfileRef, client_ssl: &BTreeSet<ProfileKey>) -> Vec<String> {
    let mut found: Vec<(u64, String)> = client_ssl
        .iter()
        .filter(|(p, f, _)| *p == target.partition && *f == target.folder)
        .filter_map(|(_, _, name)| sibling_index(&target.name, name).map(|i| (i, name.clone())))
        .collect();
    found.sort();
    found.into_iter().map(|(_, name)| name).collect()
}

/// `Some(i)` when `candidate` is `<base>-<i>-`.
fn sibling_index(base: &str, candidate: &str) -> Option<u64> {
    let digits = candidate
        .strip_prefix(base)?
        .strip_prefix('-')?
        .strip_suffix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
