//! Dependency Graph Builder
//!
//! Walks package descriptors from a root coordinate and fills two
//! deduplicated collections: archives (with edges to the archives they
//! depend on) and plain libraries. Every call follows the same steps:
//!
//! locate -> check existing -> skip | replace -> register -> read descriptor -> recurse
//!
//! Problems never stop the walk. They are recorded as diagnostics and
//! only the subtree that caused them is abandoned.

use std::path::{Path, PathBuf};

use aarstage_core::{DiagnosticKind, Diagnostics};
use serde::Serialize;
use tracing::{debug, info};

use crate::coordinate::{Coordinate, PackageKind};
use crate::descriptor::DescriptorReader;
use crate::entry::{PackageCollection, PackageEntry};
use crate::repository::RepositorySet;
use crate::version::{normalize_version_expression, NormalizedVersion, VersionOrdinal};

/// Outcome of one resolve call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// New artifact name
    Registered,
    /// Superseded an older version of the same artifact
    Replaced { previous: String },
    /// An equal or newer version was already registered
    Skipped { existing: String },
    /// No repository holds the coordinate
    NotFound,
}

impl Resolution {
    /// Whether the call created an entry
    pub fn is_registered(&self) -> bool {
        matches!(self, Resolution::Registered | Resolution::Replaced { .. })
    }
}

/// Serializable view of a finished graph
#[derive(Debug, Serialize)]
pub struct GraphSnapshot<'a> {
    pub repositories: &'a [PathBuf],
    pub archives: Vec<&'a PackageEntry>,
    pub libraries: Vec<&'a PackageEntry>,
    pub diagnostics: &'a Diagnostics,
}

/// Resolution engine
#[derive(Debug, Default)]
pub struct DependencyGraphBuilder {
    repositories: RepositorySet,
    archives: PackageCollection,
    libraries: PackageCollection,
    diagnostics: Diagnostics,
}

impl DependencyGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_repository(&mut self, path: impl Into<PathBuf>) -> bool {
        self.repositories.add_root(path)
    }

    pub fn add_repositories(&mut self, root: &Path, pattern: &str) -> usize {
        self.repositories.add_roots_recursively(root, pattern)
    }

    pub fn add_new_archive(
        &mut self,
        group: &str,
        artifact: &str,
        version: &str,
        resolve_transitive: bool,
    ) -> Resolution {
        self.resolve_archive(&Coordinate::new(group, artifact, version), resolve_transitive)
    }

    pub fn add_new_library(&mut self, group: &str, artifact: &str, version: &str) -> Resolution {
        self.resolve_library(&Coordinate::new(group, artifact, version))
    }

    /// Resolve an archive and, if `resolve_transitive`, everything it depends on
    pub fn resolve_archive(&mut self, coordinate: &Coordinate, resolve_transitive: bool) -> Resolution {
        self.resolve(PackageKind::Archive, coordinate, resolve_transitive)
    }

    /// Resolve a library and the libraries its own descriptor declares
    pub fn resolve_library(&mut self, coordinate: &Coordinate) -> Resolution {
        self.resolve(PackageKind::Library, coordinate, true)
    }

    fn resolve(&mut self, kind: PackageKind, coordinate: &Coordinate, resolve_transitive: bool) -> Resolution {
        let Some(directory) = self.repositories.locate(coordinate) else {
            self.diagnostics.report(
                DiagnosticKind::NotFound,
                coordinate.to_string(),
                format!(
                    "{}: Unable to find package {}/{}!",
                    kind.label(),
                    coordinate.group,
                    coordinate.artifact
                ),
            );
            return Resolution::NotFound;
        };

        let candidate = VersionOrdinal::parse(&coordinate.version);
        let previous = match self.collection(kind).get(&coordinate.artifact) {
            Some(existing) if existing.ordinal() >= candidate => {
                debug!(
                    "{}: {} already resolved at {}, skipping {}",
                    kind.label(),
                    coordinate.artifact,
                    existing.version,
                    coordinate.version
                );
                return Resolution::Skipped {
                    existing: existing.version.clone(),
                };
            }
            Some(existing) => Some(existing.version.clone()),
            None => None,
        };

        let entry = PackageEntry::new(coordinate, kind, &directory);
        let base_path = entry.base_path.clone();
        info!("{}: {}", kind.label(), entry.base_name());
        self.collection_mut(kind).replace(entry);

        let resolution = match previous {
            Some(previous) => {
                debug!("{}: replaced {} {}", kind.label(), coordinate.artifact, previous);
                Resolution::Replaced { previous }
            }
            None => Resolution::Registered,
        };

        if resolve_transitive {
            self.resolve_children(kind, coordinate, &base_path);
        }

        resolution
    }

    fn resolve_children(&mut self, kind: PackageKind, parent: &Coordinate, base_path: &Path) {
        let declarations = match DescriptorReader::read(base_path) {
            Ok(declarations) => declarations,
            Err(e) => {
                let diagnostic = if e.is_missing() {
                    DiagnosticKind::DescriptorMissing
                } else {
                    DiagnosticKind::DescriptorParseError
                };
                self.diagnostics.report(diagnostic, parent.to_string(), e.to_string());
                return;
            }
        };
        let descriptor = DescriptorReader::descriptor_path(base_path);

        for declaration in declarations {
            if declaration.is_test_scope() {
                debug!("Skipping test dependency {}:{}", declaration.group, declaration.artifact);
                continue;
            }

            let child_kind = declaration.kind();
            let version = match normalize_version_expression(&declaration.version) {
                NormalizedVersion::Clean(version) => version,
                NormalizedVersion::Unparsable(original) => {
                    self.diagnostics.report(
                        DiagnosticKind::VersionUnparsable,
                        format!("{}:{}", declaration.group, declaration.artifact),
                        format!("Unknown version format {} in {}", original, descriptor.display()),
                    );
                    original
                }
            };
            let child = Coordinate::new(declaration.group, declaration.artifact, version);

            match child_kind {
                PackageKind::Archive => {
                    if kind == PackageKind::Archive {
                        self.record_edge(parent, &child.artifact);
                    }
                    self.resolve_archive(&child, true);
                }
                PackageKind::Library => {
                    self.resolve_library(&child);
                }
            }
        }
    }

    /// Edges only attach to the entry that registered them. A parent
    /// superseded during its own subtree walk keeps nothing.
    fn record_edge(&mut self, parent: &Coordinate, dependency: &str) {
        match self.archives.get_mut(&parent.artifact) {
            Some(entry) if entry.version == parent.version => {
                entry.dependencies.insert(dependency.to_string());
            }
            _ => debug!("{} was superseded, dropping edge to {}", parent, dependency),
        }
    }

    fn collection(&self, kind: PackageKind) -> &PackageCollection {
        match kind {
            PackageKind::Archive => &self.archives,
            PackageKind::Library => &self.libraries,
        }
    }

    fn collection_mut(&mut self, kind: PackageKind) -> &mut PackageCollection {
        match kind {
            PackageKind::Archive => &mut self.archives,
            PackageKind::Library => &mut self.libraries,
        }
    }

    pub fn repositories(&self) -> &RepositorySet {
        &self.repositories
    }

    pub fn archives(&self) -> &PackageCollection {
        &self.archives
    }

    pub fn libraries(&self) -> &PackageCollection {
        &self.libraries
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Hand the accumulated diagnostics to the caller, leaving none behind
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn snapshot(&self) -> GraphSnapshot<'_> {
        GraphSnapshot {
            repositories: self.repositories.roots(),
            archives: self.archives.iter().collect(),
            libraries: self.libraries.iter().collect(),
            diagnostics: &self.diagnostics,
        }
    }

    /// Human-readable listing of every resolved entry, also written to the log
    pub fn dump(&self) -> String {
        let mut lines = vec!["ALL DEPENDENCIES".to_string()];

        for entry in &self.archives {
            lines.push(format!("AAR: {}", entry.coordinate()));
            for dependency in &entry.dependencies {
                lines.push(format!("    {}", dependency));
            }
        }
        for entry in &self.libraries {
            lines.push(format!("JAR: {}", entry.coordinate()));
        }

        for line in &lines {
            info!("{}", line);
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Dep<'a> {
        artifact: &'a str,
        version: &'a str,
        scope: Option<&'a str>,
        type_: Option<&'a str>,
    }

    fn aar<'a>(artifact: &'a str, version: &'a str) -> Dep<'a> {
        Dep { artifact, version, scope: None, type_: Some("aar") }
    }

    fn jar<'a>(artifact: &'a str, version: &'a str) -> Dep<'a> {
        Dep { artifact, version, scope: None, type_: None }
    }

    /// Publish `com.example:<artifact>:<version>` with a descriptor listing `deps`
    fn publish(root: &Path, artifact: &str, version: &str, kind: PackageKind, deps: &[Dep<'_>]) {
        let dir = root.join("com/example").join(artifact).join(version);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}-{}.{}", artifact, version, kind.extension())), b"bin").unwrap();

        let mut xml = String::from(
            "<project xmlns=\"http://maven.apache.org/POM/4.0.0\">\n  <dependencies>\n",
        );
        for dep in deps {
            xml.push_str("    <dependency>\n      <groupId>com.example</groupId>\n");
            xml.push_str(&format!("      <artifactId>{}</artifactId>\n", dep.artifact));
            xml.push_str(&format!("      <version>{}</version>\n", dep.version));
            if let Some(scope) = dep.scope {
                xml.push_str(&format!("      <scope>{}</scope>\n", scope));
            }
            if let Some(type_) = dep.type_ {
                xml.push_str(&format!("      <type>{}</type>\n", type_));
            }
            xml.push_str("    </dependency>\n");
        }
        xml.push_str("  </dependencies>\n</project>\n");
        fs::write(dir.join(format!("{}-{}.pom", artifact, version)), xml).unwrap();
    }

    fn builder(repo: &TempDir) -> DependencyGraphBuilder {
        let mut builder = DependencyGraphBuilder::new();
        assert!(builder.add_repository(repo.path()));
        builder
    }

    fn versions(collection: &PackageCollection) -> Vec<String> {
        collection.iter().map(|e| e.base_name()).collect()
    }

    #[test]
    fn test_transitive_archive_resolution() {
        let repo = tempfile::tempdir().unwrap();
        publish(repo.path(), "libfoo", "1.0", PackageKind::Archive, &[aar("libbar", "2.0"), jar("gson", "2.8")]);
        publish(repo.path(), "libbar", "2.0", PackageKind::Archive, &[]);
        publish(repo.path(), "libbar", "1.0", PackageKind::Archive, &[]);
        publish(repo.path(), "gson", "2.8", PackageKind::Library, &[]);

        let mut builder = builder(&repo);
        let resolution = builder.add_new_archive("com.example", "libfoo", "1.0", true);

        assert_eq!(resolution, Resolution::Registered);
        assert_eq!(versions(builder.archives()), vec!["libfoo-1.0", "libbar-2.0"]);
        assert_eq!(versions(builder.libraries()), vec!["gson-2.8"]);

        let libfoo = builder.archives().get("libfoo").unwrap();
        assert_eq!(libfoo.dependencies.iter().collect::<Vec<_>>(), vec!["libbar"]);
        assert!(builder.diagnostics().is_empty());
    }

    #[test]
    fn test_older_version_is_skipped() {
        let repo = tempfile::tempdir().unwrap();
        publish(repo.path(), "x", "1.0", PackageKind::Archive, &[]);
        publish(repo.path(), "x", "0.9", PackageKind::Archive, &[aar("y", "1.0")]);
        publish(repo.path(), "y", "1.0", PackageKind::Archive, &[]);

        let mut builder = builder(&repo);
        builder.add_new_archive("com.example", "x", "1.0", true);
        let resolution = builder.add_new_archive("com.example", "x", "0.9", true);

        assert_eq!(resolution, Resolution::Skipped { existing: "1.0".into() });
        assert_eq!(versions(builder.archives()), vec!["x-1.0"]);
        assert!(builder.archives().get("x").unwrap().dependencies.is_empty());
        assert!(!builder.archives().contains("y"));
    }

    #[test]
    fn test_replacement_drops_previous_edges() {
        let repo = tempfile::tempdir().unwrap();
        publish(repo.path(), "x", "0.9", PackageKind::Archive, &[aar("y", "1.0")]);
        publish(repo.path(), "x", "1.0", PackageKind::Archive, &[]);
        publish(repo.path(), "y", "1.0", PackageKind::Archive, &[]);

        let mut builder = builder(&repo);
        builder.add_new_archive("com.example", "x", "0.9", true);
        assert_eq!(builder.archives().get("x").unwrap().dependencies.len(), 1);

        let resolution = builder.add_new_archive("com.example", "x", "1.0", true);
        assert_eq!(resolution, Resolution::Replaced { previous: "0.9".into() });

        // y stays registered, the new x simply has no edge to it
        assert_eq!(versions(builder.archives()), vec!["y-1.0", "x-1.0"]);
        assert!(builder.archives().get("x").unwrap().dependencies.is_empty());
    }

    #[test]
    fn test_equal_version_keeps_first() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        publish(second.path(), "x", "1.0.0", PackageKind::Archive, &[]);
        publish(first.path(), "x", "1.0", PackageKind::Archive, &[]);

        let mut builder = DependencyGraphBuilder::new();
        builder.add_repository(first.path());
        builder.add_repository(second.path());

        builder.add_new_archive("com.example", "x", "1.0", true);
        let resolution = builder.add_new_archive("com.example", "x", "1.0.0", true);

        assert_eq!(resolution, Resolution::Skipped { existing: "1.0".into() });
        assert_eq!(builder.archives().get("x").unwrap().version, "1.0");
    }

    #[test]
    fn test_resolving_twice_is_idempotent() {
        let repo = tempfile::tempdir().unwrap();
        publish(repo.path(), "libfoo", "1.0", PackageKind::Archive, &[aar("libbar", "2.0")]);
        publish(repo.path(), "libbar", "2.0", PackageKind::Archive, &[]);

        let mut builder = builder(&repo);
        builder.add_new_archive("com.example", "libfoo", "1.0", true);
        let before = builder.archives().clone();

        let resolution = builder.add_new_archive("com.example", "libfoo", "1.0", true);
        assert!(!resolution.is_registered());
        assert_eq!(versions(builder.archives()), versions(&before));
        assert_eq!(builder.archives().get("libfoo").unwrap().dependencies.len(), 1);
    }

    #[test]
    fn test_test_scope_is_excluded() {
        let repo = tempfile::tempdir().unwrap();
        let junit = Dep { artifact: "junit", version: "4.12", scope: Some("test"), type_: None };
        let espresso = Dep { artifact: "espresso", version: "3.0", scope: Some("test"), type_: Some("aar") };
        publish(repo.path(), "libfoo", "1.0", PackageKind::Archive, &[junit, espresso]);
        publish(repo.path(), "junit", "4.12", PackageKind::Library, &[]);
        publish(repo.path(), "espresso", "3.0", PackageKind::Archive, &[]);

        let mut builder = builder(&repo);
        builder.add_new_archive("com.example", "libfoo", "1.0", true);

        assert_eq!(versions(builder.archives()), vec!["libfoo-1.0"]);
        assert!(builder.libraries().is_empty());
        assert!(builder.archives().get("libfoo").unwrap().dependencies.is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        let repo = tempfile::tempdir().unwrap();
        publish(repo.path(), "a", "1.0", PackageKind::Archive, &[aar("b", "1.0")]);
        publish(repo.path(), "b", "1.0", PackageKind::Archive, &[aar("a", "1.0")]);

        let mut builder = builder(&repo);
        builder.add_new_archive("com.example", "a", "1.0", true);

        assert_eq!(versions(builder.archives()), vec!["a-1.0", "b-1.0"]);
        assert!(builder.archives().get("a").unwrap().dependencies.contains("b"));
        assert!(builder.archives().get("b").unwrap().dependencies.contains("a"));
    }

    #[test]
    fn test_not_found_is_contained() {
        let repo = tempfile::tempdir().unwrap();
        publish(repo.path(), "libfoo", "1.0", PackageKind::Archive, &[aar("missing", "1.0"), aar("libbar", "2.0")]);
        publish(repo.path(), "libbar", "2.0", PackageKind::Archive, &[]);

        let mut builder = builder(&repo);
        builder.add_new_archive("com.example", "libfoo", "1.0", true);

        // The sibling after the missing package still resolves
        assert_eq!(versions(builder.archives()), vec!["libfoo-1.0", "libbar-2.0"]);
        assert_eq!(builder.diagnostics().count(DiagnosticKind::NotFound), 1);

        let resolution = builder.add_new_archive("com.example", "nothing", "1.0", true);
        assert_eq!(resolution, Resolution::NotFound);
        assert_eq!(builder.diagnostics().count(DiagnosticKind::NotFound), 2);
    }

    #[test]
    fn test_descriptor_problems_keep_entry() {
        let repo = tempfile::tempdir().unwrap();
        let dir = repo.path().join("com/example/bare/1.0");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("bare-1.0.aar"), b"bin").unwrap();

        publish(repo.path(), "broken", "1.0", PackageKind::Archive, &[]);
        fs::write(repo.path().join("com/example/broken/1.0/broken-1.0.pom"), "<project><dependencies>").unwrap();

        let mut builder = builder(&repo);
        assert!(builder.add_new_archive("com.example", "bare", "1.0", true).is_registered());
        assert!(builder.add_new_archive("com.example", "broken", "1.0", true).is_registered());

        assert_eq!(builder.archives().len(), 2);
        assert!(builder.diagnostics().has(DiagnosticKind::DescriptorMissing));
        assert!(builder.diagnostics().has(DiagnosticKind::DescriptorParseError));
    }

    #[test]
    fn test_non_transitive_reads_no_descriptor() {
        let repo = tempfile::tempdir().unwrap();
        publish(repo.path(), "libfoo", "1.0", PackageKind::Archive, &[aar("libbar", "2.0")]);
        publish(repo.path(), "libbar", "2.0", PackageKind::Archive, &[]);

        let mut builder = builder(&repo);
        builder.add_new_archive("com.example", "libfoo", "1.0", false);

        assert_eq!(versions(builder.archives()), vec!["libfoo-1.0"]);
        assert!(builder.archives().get("libfoo").unwrap().dependencies.is_empty());
    }

    #[test]
    fn test_version_ranges_and_unparsable_versions() {
        let repo = tempfile::tempdir().unwrap();
        publish(
            repo.path(),
            "libfoo",
            "1.0",
            PackageKind::Archive,
            &[aar("libbar", "[1.0,2.0)"), jar("gson", "[,)")],
        );
        publish(repo.path(), "libbar", "2.0", PackageKind::Archive, &[]);

        let mut builder = builder(&repo);
        builder.add_new_archive("com.example", "libfoo", "1.0", true);

        assert_eq!(builder.archives().get("libbar").unwrap().version, "2.0");
        assert_eq!(builder.diagnostics().count(DiagnosticKind::VersionUnparsable), 1);
        // The original expression is used and fails to locate
        assert_eq!(builder.diagnostics().count(DiagnosticKind::NotFound), 1);
    }

    #[test]
    fn test_library_descriptors_are_followed() {
        let repo = tempfile::tempdir().unwrap();
        publish(repo.path(), "core", "1.0", PackageKind::Library, &[jar("util", "1.1"), aar("ui", "1.0")]);
        publish(repo.path(), "util", "1.1", PackageKind::Library, &[]);
        publish(repo.path(), "ui", "1.0", PackageKind::Archive, &[]);

        let mut builder = builder(&repo);
        builder.add_new_library("com.example", "core", "1.0");

        assert_eq!(versions(builder.libraries()), vec!["core-1.0", "util-1.1"]);
        // Libraries carry no edges but still pull in the archives they name
        assert_eq!(versions(builder.archives()), vec!["ui-1.0"]);
        assert!(builder.libraries().iter().all(|e| e.dependencies.is_empty()));
    }

    #[test]
    fn test_dump_lists_entries() {
        let repo = tempfile::tempdir().unwrap();
        publish(repo.path(), "libfoo", "1.0", PackageKind::Archive, &[aar("libbar", "2.0"), jar("gson", "2.8")]);
        publish(repo.path(), "libbar", "2.0", PackageKind::Archive, &[]);
        publish(repo.path(), "gson", "2.8", PackageKind::Library, &[]);

        let mut builder = builder(&repo);
        builder.add_new_archive("com.example", "libfoo", "1.0", true);

        let dump = builder.dump();
        assert_eq!(
            dump,
            "ALL DEPENDENCIES\n\
             AAR: com.example:libfoo:1.0\n    libbar\n\
             AAR: com.example:libbar:2.0\n\
             JAR: com.example:gson:2.8\n"
        );

        let snapshot = builder.snapshot();
        assert_eq!(snapshot.archives.len(), 2);
        assert_eq!(snapshot.libraries.len(), 1);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let repo = tempfile::tempdir().unwrap();
        publish(repo.path(), "libfoo", "1.0", PackageKind::Archive, &[aar("libbar", "2.0"), aar("ghost", "1.0")]);
        publish(repo.path(), "libbar", "2.0", PackageKind::Archive, &[]);

        let mut builder = builder(&repo);
        builder.add_new_archive("com.example", "libfoo", "1.0", true);

        let json = serde_json::to_value(builder.snapshot()).unwrap();
        let archives = json["archives"].as_array().unwrap();
        assert_eq!(archives.len(), 2);
        assert_eq!(archives[0]["artifact"], "libfoo");
        assert_eq!(archives[0]["kind"], "archive");
        assert_eq!(archives[0]["dependencies"], serde_json::json!(["libbar", "ghost"]));
        assert_eq!(archives[1]["version"], "2.0");
        assert_eq!(json["libraries"], serde_json::json!([]));
        assert_eq!(json["repositories"].as_array().unwrap().len(), 1);

        let diagnostics = json["diagnostics"].as_array().unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0]["kind"], "not_found");
        assert_eq!(diagnostics[0]["subject"], "com.example:ghost:1.0");
    }
}
