use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::path::ResourcePath;

/// The JSON body of a single resource object.
pub type Body = Map<String, Value>;

/// Resources of one subfolder keyed by resource path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Folder {
    pub resources: BTreeMap<ResourcePath, Body>,
}

impl Folder {
    /// Insert or replace a resource body.
    pub fn insert(&mut self, path: ResourcePath, body: Body) -> Option<Body> {
        self.resources.insert(path, body)
    }

    /// Insert a resource body only when the path is not already present.
    ///
    /// Returns `true` when the body was inserted.
    pub fn insert_if_absent(&mut self, path: ResourcePath, body: Body) -> bool {
        if self.resources.contains_key(&path) {
            return false;
        }
        self.resources.insert(path, body);
        true
    }

    pub fn get(&self, path: &ResourcePath) -> Option<&Body> {
        self.resources.get(path)
    }

    pub fn get_mut(&mut self, path: &ResourcePath) -> Option<&mut Body> {
        self.resources.get_mut(path)
    }

    /// Iterate over the resources whose kind is `kind` or nested below it.
    pub fn resources_under<'a>(
        &'a self,
        kind: &'a str,
    ) -> impl Iterator<Item = (&'a ResourcePath, &'a Body)> + 'a {
        self.resources
            .iter()
            .filter(move |(path, _)| path.is_under(kind))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Subfolders of one partition keyed by subfolder name. The empty name is
/// the partition's canonical folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Partition {
    pub folders: BTreeMap<String, Folder>,
}

impl Partition {
    pub fn folder(&self, name: &str) -> Option<&Folder> {
        self.folders.get(name)
    }

    /// Return the named folder, creating it if needed.
    pub fn folder_mut(&mut self, name: &str) -> &mut Folder {
        self.folders.entry(name.to_string()).or_default()
    }
}

/// A complete set of target objects: partition → subfolder → path → body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ObjectSet {
    pub partitions: BTreeMap<String, Partition>,
}

/// One resource located inside an [`ObjectSet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Located<'a> {
    pub partition: &'a str,
    pub folder: &'a str,
    pub path: &'a ResourcePath,
    pub body: &'a Body,
}

impl ObjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition(&self, name: &str) -> Option<&Partition> {
        self.partitions.get(name)
    }

    /// Return the named partition, creating it if needed.
    pub fn partition_mut(&mut self, name: &str) -> &mut Partition {
        self.partitions.entry(name.to_string()).or_default()
    }

    pub fn folder(&self, partition: &str, folder: &str) -> Option<&Folder> {
        self.partition(partition)?.folder(folder)
    }

    /// Return the folder `partition/folder`, creating both levels if needed.
    pub fn folder_mut(&mut self, partition: &str, folder: &str) -> &mut Folder {
        self.partition_mut(partition).folder_mut(folder)
    }

    /// Look up a single resource body.
    pub fn get(&self, partition: &str, folder: &str, path: &ResourcePath) -> Option<&Body> {
        self.folder(partition, folder)?.get(path)
    }

    /// Walk every resource in sorted partition, folder, path order.
    pub fn iter(&self) -> impl Iterator<Item = Located<'_>> {
        self.partitions.iter().flat_map(|(partition, p)| {
            p.folders.iter().flat_map(move |(folder, f)| {
                f.resources.iter().map(move |(path, body)| Located {
                    partition,
                    folder,
                    path,
                    body,
                })
            })
        })
    }

    /// Total number of resources across all partitions and folders.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions
            .values()
            .all(|p| p.folders.values().all(Folder::is_empty))
    }
}
