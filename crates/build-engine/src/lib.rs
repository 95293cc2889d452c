//! aarstage Build Engine
//!
//! Turns a resolved dependency graph into files on disk: extracted
//! archives with legacy project descriptors, copied libraries, and the
//! Gradle import and project files used instead of them in Gradle mode.

pub mod extract;
pub mod gradle;
pub mod libraries;
pub mod project_properties;
pub mod stager;

pub use extract::ArchiveExtractor;
pub use gradle::{clean_previous_extraction, GradleImports, GradleProjectConverter};
pub use libraries::{CollectReport, LibraryCollector};
pub use project_properties::LegacyProjectDescriptor;
pub use stager::{write_extract_list, ArchiveStager, StageReport};

/// Build errors
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid archive {path}: {message}")]
    Archive { path: String, message: String },
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl BuildError {
    pub(crate) fn archive(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        BuildError::Archive {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }
}

/// Compiled classes inside an archive
pub const CLASSES_JAR: &str = "classes.jar";

/// Placeholder source directory required by legacy builds
pub const SOURCE_DIR: &str = "src";
