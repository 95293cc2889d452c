//! aarstage - Android archive dependency resolver and stager
//!
//! Resolves Android archives (AAR) and plain libraries (JAR) from local
//! Maven repositories, keeping the newest version of each artifact, and
//! stages them into a build tree for legacy or Gradle packaging.
//!
//! ## Architecture
//!
//! - `aarstage-core`: configuration, import lists, diagnostics
//! - `aarstage-android-toolchain`: Android SDK detection
//! - `aarstage-maven-resolver`: coordinates, versions, descriptor reading and graph building
//! - `aarstage-manifest-manager`: archive manifest reading and application-id stamping
//! - `aarstage-build-engine`: extraction, library copying, Gradle generation

#![warn(clippy::all)]

pub mod commands;
pub mod session;

// Re-export main components for library usage
pub use aarstage_core as core;
pub use aarstage_android_toolchain as toolchain;
pub use aarstage_maven_resolver as resolver;
pub use aarstage_manifest_manager as manifest;
pub use aarstage_build_engine as build;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::session::{StageSummary, StagingSession};
    pub use aarstage_build_engine::{ArchiveStager, GradleImports, GradleProjectConverter, LibraryCollector};
    pub use aarstage_core::{DiagnosticKind, Diagnostics, ImportList, StagerConfig};
    pub use aarstage_maven_resolver::{Coordinate, DependencyGraphBuilder, Resolution};
}
