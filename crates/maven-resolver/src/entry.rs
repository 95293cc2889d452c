//! Resolved Packages
//!
//! A collection holds at most one entry per artifact name: the newest
//! version seen. Replacing an entry removes it and appends the new one,
//! so iteration order is the order in which the surviving versions were
//! registered.

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::coordinate::{Coordinate, PackageKind};
use crate::version::VersionOrdinal;

/// One resolved package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageEntry {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub kind: PackageKind,
    /// Version directory joined with `<artifact>-<version>`, no extension
    pub base_path: PathBuf,
    /// Archive artifacts this archive depends on; always empty for libraries
    pub dependencies: IndexSet<String>,
}

impl PackageEntry {
    pub fn new(coordinate: &Coordinate, kind: PackageKind, directory: &Path) -> Self {
        Self {
            group: coordinate.group.clone(),
            artifact: coordinate.artifact.clone(),
            version: coordinate.version.clone(),
            kind,
            base_path: directory.join(coordinate.base_name()),
            dependencies: IndexSet::new(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group, &self.artifact, &self.version)
    }

    /// `<artifact>-<version>`
    pub fn base_name(&self) -> String {
        format!("{}-{}", self.artifact, self.version)
    }

    /// The package binary (`.aar` or `.jar`)
    pub fn binary_path(&self) -> PathBuf {
        let mut file = self.base_path.as_os_str().to_owned();
        file.push(".");
        file.push(self.kind.extension());
        PathBuf::from(file)
    }

    pub fn ordinal(&self) -> VersionOrdinal {
        VersionOrdinal::parse(&self.version)
    }
}

/// Entries keyed by artifact name
#[derive(Debug, Clone, Default)]
pub struct PackageCollection {
    entries: IndexMap<String, PackageEntry>,
}

impl PackageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, artifact: &str) -> Option<&PackageEntry> {
        self.entries.get(artifact)
    }

    pub(crate) fn get_mut(&mut self, artifact: &str) -> Option<&mut PackageEntry> {
        self.entries.get_mut(artifact)
    }

    pub fn contains(&self, artifact: &str) -> bool {
        self.entries.contains_key(artifact)
    }

    /// Insert `entry`, dropping any entry with the same artifact name.
    ///
    /// The new entry goes to the end. Returns the dropped entry.
    pub(crate) fn replace(&mut self, entry: PackageEntry) -> Option<PackageEntry> {
        let previous = self.entries.shift_remove(&entry.artifact);
        self.entries.insert(entry.artifact.clone(), entry);
        previous
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a PackageCollection {
    type Item = &'a PackageEntry;
    type IntoIter = indexmap::map::Values<'a, String, PackageEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl FromIterator<PackageEntry> for PackageCollection {
    fn from_iter<I: IntoIterator<Item = PackageEntry>>(iter: I) -> Self {
        let mut collection = PackageCollection::new();
        for entry in iter {
            collection.replace(entry);
        }
        collection
    }
}
