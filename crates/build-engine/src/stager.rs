//! Archive Stager
//!
//! Extracts every resolved archive into `<build>/JavaLibs/<artifact>-<version>/`
//! and turns it into a legacy library project. A staging directory that
//! already holds the archive's manifest is treated as done; archive
//! contents are not compared.

use std::fs;
use std::path::{Path, PathBuf};

use aarstage_core::{DiagnosticKind, Diagnostics, LayoutConfig, StagingConfig};
use aarstage_manifest_manager::{stamp_manifest_file, MANIFEST_FILE_NAME};
use aarstage_maven_resolver::{PackageCollection, PackageEntry, PackageKind};
use tracing::{debug, info, warn};

use crate::extract::ArchiveExtractor;
use crate::project_properties::LegacyProjectDescriptor;
use crate::{BuildError, CLASSES_JAR, SOURCE_DIR};

/// What one staging pass did
#[derive(Debug, Default)]
pub struct StageReport {
    /// Staging directories written this pass
    pub staged: Vec<PathBuf>,
    /// Staging directories left alone because they were already complete
    pub skipped: Vec<PathBuf>,
    pub diagnostics: Diagnostics,
}

/// Archive stager
#[derive(Debug, Clone)]
pub struct ArchiveStager {
    java_libs_dir: PathBuf,
    libs_dir: PathBuf,
    extractor: ArchiveExtractor,
    default_min_sdk: String,
    application_id_token: String,
}

impl ArchiveStager {
    pub fn new(layout: &LayoutConfig, staging: &StagingConfig) -> Self {
        Self {
            java_libs_dir: layout.java_libs_dir.clone(),
            libs_dir: layout.libs_dir.clone(),
            extractor: ArchiveExtractor::new(staging.collision_markers.clone()),
            default_min_sdk: staging.default_min_sdk.clone(),
            application_id_token: staging.application_id_token.clone(),
        }
    }

    /// Staging directory for `entry` under `build_root`
    pub fn staging_dir(&self, build_root: &Path, entry: &PackageEntry) -> PathBuf {
        build_root.join(&self.java_libs_dir).join(entry.base_name())
    }

    /// Stage every archive in `archives`
    pub fn stage(&self, archives: &PackageCollection, build_root: &Path, app_package: &str) -> StageReport {
        let mut report = StageReport::default();

        for entry in archives.iter().filter(|e| e.kind == PackageKind::Archive) {
            let staging_dir = self.staging_dir(build_root, entry);

            if staging_dir.join(MANIFEST_FILE_NAME).is_file() {
                debug!("{} already staged", entry.base_name());
                report.skipped.push(staging_dir);
                continue;
            }

            match self.stage_one(entry, archives, &staging_dir, app_package, &mut report.diagnostics) {
                Ok(()) => {
                    info!("Extracted {} to {}", entry.base_name(), staging_dir.display());
                    report.staged.push(staging_dir);
                }
                Err(e) => {
                    report.diagnostics.report(
                        DiagnosticKind::ArchiveError,
                        entry.coordinate().to_string(),
                        e.to_string(),
                    );
                    // A partial directory would pass the sentinel check next run
                    if staging_dir.exists() {
                        if let Err(e) = fs::remove_dir_all(&staging_dir) {
                            warn!("Failed to remove partial {}: {}", staging_dir.display(), e);
                        }
                    }
                }
            }
        }

        report
    }

    fn stage_one(
        &self,
        entry: &PackageEntry,
        archives: &PackageCollection,
        staging_dir: &Path,
        app_package: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), BuildError> {
        self.extractor
            .extract(&entry.binary_path(), staging_dir, &entry.base_name())?;

        fs::create_dir_all(staging_dir.join(SOURCE_DIR))?;

        let classes = staging_dir.join(CLASSES_JAR);
        if classes.is_file() {
            let libs = staging_dir.join(&self.libs_dir);
            fs::create_dir_all(&libs)?;
            fs::rename(&classes, libs.join(format!("{}.{}", entry.artifact, PackageKind::Library.extension())))?;
        }

        let manifest_path = staging_dir.join(MANIFEST_FILE_NAME);
        let min_sdk = match stamp_manifest_file(&manifest_path, &self.application_id_token, app_package) {
            Ok(stamped) => stamped.manifest.min_sdk_or(&self.default_min_sdk).to_string(),
            Err(e) => {
                diagnostics.report(
                    DiagnosticKind::ManifestError,
                    manifest_path.display().to_string(),
                    format!("AAR Manifest file parsing error! {}", e),
                );
                self.default_min_sdk.clone()
            }
        };

        let mut descriptor = LegacyProjectDescriptor::new(min_sdk);
        for dependency in &entry.dependencies {
            if let Some(target) = archives.get(dependency) {
                descriptor.add_reference(target.base_name());
            }
        }
        descriptor.write(staging_dir)?;

        Ok(())
    }
}

/// Write the base path of every archive, one per line, to `path`
pub fn write_extract_list(archives: &PackageCollection, path: &Path) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut contents = String::new();
    for entry in archives {
        contents.push_str(&entry.base_path.display().to_string());
        contents.push('\n');
    }

    fs::write(path, contents)?;
    debug!("Wrote extract list {}", path.display());
    Ok(())
}
