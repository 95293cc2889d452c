//! Repository Set
//!
//! Ordered list of local Maven repository roots. A package lives at
//! `<root>/<group segments>/<artifact>/<version>/`; the first root that
//! has that directory wins.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::coordinate::Coordinate;

/// Ordered repository roots
#[derive(Debug, Clone, Default)]
pub struct RepositorySet {
    roots: Vec<PathBuf>,
}

impl RepositorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root if the directory exists. Returns whether it was added.
    pub fn add_root(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();

        if !path.is_dir() {
            error!("AddRepository: Directory {} not found!", path.display());
            return false;
        }
        if self.roots.contains(&path) {
            debug!("Repository {} already registered", path.display());
            return false;
        }

        info!("Added repository: {}", path.display());
        self.roots.push(path);
        true
    }

    /// Walk `root` and add every directory whose name contains `pattern`.
    ///
    /// Matching directories are not descended into. Returns how many roots
    /// were added.
    pub fn add_roots_recursively(&mut self, root: &Path, pattern: &str) -> usize {
        if !root.is_dir() {
            warn!("AddRepositories: Directory {} not found!", root.display());
            return 0;
        }

        let mut added = 0;
        let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name().into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable directory under {}: {}", root.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            if entry.file_name().to_string_lossy().contains(pattern) {
                if self.add_root(entry.path()) {
                    added += 1;
                }
                walker.skip_current_dir();
            }
        }

        added
    }

    /// Directory holding `coordinate`, searching roots in insertion order
    pub fn locate(&self, coordinate: &Coordinate) -> Option<PathBuf> {
        let relative = coordinate
            .group_path()
            .join(&coordinate.artifact)
            .join(&coordinate.version);

        self.roots
            .iter()
            .map(|root| root.join(&relative))
            .find(|candidate| candidate.is_dir())
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_add_root_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut repos = RepositorySet::new();

        assert!(!repos.add_root(dir.path().join("missing")));
        assert!(repos.add_root(dir.path()));
        assert!(!repos.add_root(dir.path()));
        assert_eq!(repos.len(), 1);
    }

    #[test]
    fn test_locate_first_root_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        for root in [first.path(), second.path()] {
            fs::create_dir_all(root.join("com/example/libfoo/1.0")).unwrap();
        }
        fs::create_dir_all(second.path().join("com/example/libbar/2.0")).unwrap();

        let mut repos = RepositorySet::new();
        repos.add_root(first.path());
        repos.add_root(second.path());

        let coord = Coordinate::new("com.example", "libfoo", "1.0");
        assert_eq!(repos.locate(&coord), Some(first.path().join("com/example/libfoo/1.0")));

        let coord = Coordinate::new("com.example", "libbar", "2.0");
        assert_eq!(repos.locate(&coord), Some(second.path().join("com/example/libbar/2.0")));

        let coord = Coordinate::new("com.example", "libbar", "3.0");
        assert_eq!(repos.locate(&coord), None);
    }

    #[test]
    fn test_recursive_discovery_stops_at_match() {
        let sdk = tempfile::tempdir().unwrap();
        let google = sdk.path().join("extras/google/m2repository");
        let android = sdk.path().join("extras/android/m2repository");
        fs::create_dir_all(google.join("nested/m2repository")).unwrap();
        fs::create_dir_all(&android).unwrap();
        fs::create_dir_all(sdk.path().join("platforms/android-26")).unwrap();

        let mut repos = RepositorySet::new();
        let added = repos.add_roots_recursively(sdk.path(), "m2repository");

        assert_eq!(added, 2);
        assert_eq!(repos.roots(), &[android, google]);
    }

    #[test]
    fn test_recursive_discovery_missing_root() {
        let mut repos = RepositorySet::new();
        assert_eq!(repos.add_roots_recursively(Path::new("/no/such/sdk/here"), "m2repository"), 0);
        assert!(repos.is_empty());
    }
}
