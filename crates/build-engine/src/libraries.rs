//! Library Collector
//!
//! Copies resolved plain libraries into one flat directory. A file that
//! already exists under the destination name is kept as is.

use std::fs;
use std::path::{Path, PathBuf};

use aarstage_core::{DiagnosticKind, Diagnostics};
use aarstage_maven_resolver::PackageCollection;
use tracing::{debug, info};

/// What one copy pass did
#[derive(Debug, Default)]
pub struct CollectReport {
    pub copied: Vec<PathBuf>,
    /// Destinations that already existed
    pub skipped: Vec<PathBuf>,
    pub diagnostics: Diagnostics,
}

/// Library collector
#[derive(Debug, Clone)]
pub struct LibraryCollector {
    libs_dir: PathBuf,
}

impl LibraryCollector {
    /// `libs_dir` is relative to the build root passed to [`collect`](Self::collect)
    pub fn new(libs_dir: impl Into<PathBuf>) -> Self {
        Self {
            libs_dir: libs_dir.into(),
        }
    }

    pub fn collect(&self, libraries: &PackageCollection, build_root: &Path) -> CollectReport {
        let mut report = CollectReport::default();
        let dest_dir = build_root.join(&self.libs_dir);

        if let Err(e) = fs::create_dir_all(&dest_dir) {
            report.diagnostics.report(
                DiagnosticKind::ArchiveError,
                dest_dir.display().to_string(),
                format!("Unable to create library directory: {}", e),
            );
            return report;
        }

        for entry in libraries {
            let dest = dest_dir.join(format!("{}.{}", entry.artifact, entry.kind.extension()));
            if dest.exists() {
                debug!("{} already present", dest.display());
                report.skipped.push(dest);
                continue;
            }

            match fs::copy(entry.binary_path(), &dest) {
                Ok(_) => {
                    info!("Copied JAR {} to {}", entry.base_name(), dest.display());
                    report.copied.push(dest);
                }
                Err(e) => report.diagnostics.report(
                    DiagnosticKind::ArchiveError,
                    entry.coordinate().to_string(),
                    format!("Unable to copy {}: {}", entry.binary_path().display(), e),
                ),
            }
        }

        report
    }
}
