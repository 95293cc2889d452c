//! aarstage Maven Resolver
//!
//! Transitive resolution of Android archives and plain libraries over
//! local Maven repositories, keeping only the newest version of each
//! artifact.

pub mod coordinate;
pub mod descriptor;
pub mod entry;
pub mod repository;
pub mod resolver;
pub mod version;

pub use coordinate::{Coordinate, CoordinateParseError, PackageKind};
pub use descriptor::{DependencyDeclaration, DescriptorError, DescriptorReader};
pub use entry::{PackageCollection, PackageEntry};
pub use repository::RepositorySet;
pub use resolver::{DependencyGraphBuilder, GraphSnapshot, Resolution};
pub use version::{normalize_version_expression, NormalizedVersion, VersionOrdinal};
