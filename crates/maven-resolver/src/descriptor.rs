//! Dependency Descriptors
//!
//! Reads the POM file stored next to each package binary and lists the
//! dependencies it declares.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::coordinate::{PackageKind, DESCRIPTOR_EXTENSION};

/// Default `scope` of a dependency declaration
pub const DEFAULT_SCOPE: &str = "compile";

/// Default `type` of a dependency declaration
pub const DEFAULT_TYPE: &str = "jar";

/// One `<dependency>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDeclaration {
    pub group: String,
    pub artifact: String,
    /// Raw version expression, possibly a range
    pub version: String,
    pub scope: String,
    pub type_: String,
}

impl DependencyDeclaration {
    /// Test-only dependencies are never staged
    pub fn is_test_scope(&self) -> bool {
        self.scope == "test"
    }

    pub fn kind(&self) -> PackageKind {
        PackageKind::from_type(&self.type_)
    }
}

/// Descriptor errors
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("Unable to find POM file {0}")]
    Missing(PathBuf),
    #[error("POM file {path} could not be read: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("POM file {path} parsing error! {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
}

impl DescriptorError {
    /// Whether the file was absent rather than unreadable
    pub fn is_missing(&self) -> bool {
        matches!(self, DescriptorError::Missing(_))
    }
}

/// Descriptor reader
pub struct DescriptorReader;

impl DescriptorReader {
    /// Descriptor path for a package base path (`.../libfoo-1.0` -> `.../libfoo-1.0.pom`)
    pub fn descriptor_path(base_path: &Path) -> PathBuf {
        let mut file = base_path.as_os_str().to_owned();
        file.push(".");
        file.push(DESCRIPTOR_EXTENSION);
        PathBuf::from(file)
    }

    /// Read the descriptor next to `base_path`
    pub fn read(base_path: &Path) -> Result<Vec<DependencyDeclaration>, DescriptorError> {
        let path = Self::descriptor_path(base_path);
        if !path.is_file() {
            return Err(DescriptorError::Missing(path));
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| DescriptorError::Io {
            path: path.clone(),
            source,
        })?;

        Self::parse_str(&contents).map_err(|source| DescriptorError::Parse { path, source })
    }

    /// Parse descriptor text.
    ///
    /// Every `dependency` element in the root's namespace is returned, in
    /// document order. Declarations without a group, artifact or version
    /// cannot be located and are dropped.
    pub fn parse_str(xml: &str) -> Result<Vec<DependencyDeclaration>, roxmltree::Error> {
        let doc = roxmltree::Document::parse(xml)?;
        let namespace = doc.root_element().tag_name().namespace();

        let declarations = doc
            .descendants()
            .filter(|n| {
                n.is_element()
                    && n.tag_name().name() == "dependency"
                    && n.tag_name().namespace() == namespace
            })
            .filter_map(|node| {
                let group = child_text(&node, "groupId");
                let artifact = child_text(&node, "artifactId");
                let version = child_text(&node, "version");

                match (group, artifact, version) {
                    (Some(group), Some(artifact), Some(version)) => Some(DependencyDeclaration {
                        group,
                        artifact,
                        version,
                        scope: child_text(&node, "scope").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
                        type_: child_text(&node, "type").unwrap_or_else(|| DEFAULT_TYPE.to_string()),
                    }),
                    (group, artifact, _) => {
                        warn!(
                            "Ignoring incomplete dependency {}:{}",
                            group.unwrap_or_default(),
                            artifact.unwrap_or_default()
                        );
                        None
                    }
                }
            })
            .collect();

        Ok(declarations)
    }
}

fn child_text(node: &roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>libfoo</artifactId>
  <version>1.0</version>
  <packaging>aar</packaging>
  <dependencies>
    <dependency>
      <groupId>com.example</groupId>
      <artifactId>libbar</artifactId>
      <version>[2.0]</version>
      <type>aar</type>
    </dependency>
    <dependency>
      <groupId>com.example</groupId>
      <artifactId>annotations</artifactId>
      <version>1.1</version>
      <scope>provided</scope>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.12</version>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>com.example</groupId>
      <artifactId>no-version</artifactId>
    </dependency>
  </dependencies>
</project>"#;

    #[test]
    fn test_parse_declarations() {
        let deps = DescriptorReader::parse_str(SAMPLE_POM).unwrap();
        assert_eq!(deps.len(), 3);

        assert_eq!(deps[0].artifact, "libbar");
        assert_eq!(deps[0].version, "[2.0]");
        assert_eq!(deps[0].scope, "compile");
        assert_eq!(deps[0].kind(), PackageKind::Archive);

        assert_eq!(deps[1].scope, "provided");
        assert_eq!(deps[1].type_, "jar");
        assert_eq!(deps[1].kind(), PackageKind::Library);

        assert!(deps[2].is_test_scope());
    }

    #[test]
    fn test_parse_without_namespace() {
        let xml = "<project><dependencies><dependency>\
                   <groupId>g</groupId><artifactId>a</artifactId><version>1</version>\
                   </dependency></dependencies></project>";
        let deps = DescriptorReader::parse_str(xml).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].group, "g");
    }

    #[test]
    fn test_parse_error() {
        assert!(DescriptorReader::parse_str("<project><dependencies></project>").is_err());
    }

    #[test]
    fn test_read_missing_and_broken() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("libfoo-1.0");

        let err = DescriptorReader::read(&base).unwrap_err();
        assert!(err.is_missing());

        std::fs::write(DescriptorReader::descriptor_path(&base), "<project>").unwrap();
        let err = DescriptorReader::read(&base).unwrap_err();
        assert!(matches!(err, DescriptorError::Parse { .. }));
    }

    #[test]
    fn test_descriptor_path_keeps_dots() {
        let base = Path::new("/repo/com/example/libfoo/1.0.2/libfoo-1.0.2");
        assert_eq!(
            DescriptorReader::descriptor_path(base),
            PathBuf::from("/repo/com/example/libfoo/1.0.2/libfoo-1.0.2.pom")
        );
    }
}
