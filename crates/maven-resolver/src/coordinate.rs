//! Package Coordinates
//!
//! Identifies a package by group, artifact and version. Lookups key on
//! the artifact name alone; the version is comparable metadata.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Extension of dependency descriptors next to each package binary
pub const DESCRIPTOR_EXTENSION: &str = "pom";

/// (group, artifact, version) triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// Group as nested path segments (`com.example` -> `com/example`)
    pub fn group_path(&self) -> PathBuf {
        self.group
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// File stem used inside the version directory: `<artifact>-<version>`
    pub fn base_name(&self) -> String {
        format!("{}-{}", self.artifact, self.version)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// Coordinate parse errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("expected group:artifact:version, got '{0}'")]
pub struct CoordinateParseError(pub String);

impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Coordinate::new(*group, *artifact, *version))
            }
            _ => Err(CoordinateParseError(s.to_string())),
        }
    }
}

/// Which collection a package belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    /// Android archive bundling code, resources and a manifest
    Archive,
    /// Plain compiled library
    Library,
}

impl PackageKind {
    /// Map a descriptor `type` value to a kind; anything but `aar` is a library
    pub fn from_type(type_: &str) -> Self {
        if type_ == "aar" {
            PackageKind::Archive
        } else {
            PackageKind::Library
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            PackageKind::Archive => "aar",
            PackageKind::Library => "jar",
        }
    }

    /// Tag used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            PackageKind::Archive => "AAR",
            PackageKind::Library => "JAR",
        }
    }
}
