//! Archive Extraction
//!
//! Unpacks an archive member by member. Members whose names contain a
//! collision marker are per-architecture blobs that many archives ship
//! under the same leaf name; those get the owning archive's base name
//! prepended so a sibling archive cannot overwrite them later.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::BuildError;

/// Zip extractor with collision renaming
#[derive(Debug, Clone, Default)]
pub struct ArchiveExtractor {
    collision_markers: Vec<String>,
}

impl ArchiveExtractor {
    pub fn new(collision_markers: Vec<String>) -> Self {
        Self { collision_markers }
    }

    /// Relative output path for `member`, renamed if it is collision-prone
    pub fn output_name(&self, member: &Path, base_name: &str) -> PathBuf {
        let name = member.to_string_lossy();
        if !self.collision_markers.iter().any(|marker| name.contains(marker.as_str())) {
            return member.to_path_buf();
        }

        match member.file_name() {
            Some(leaf) => {
                let renamed = format!("{}_{}", base_name, leaf.to_string_lossy());
                member.with_file_name(renamed)
            }
            None => member.to_path_buf(),
        }
    }

    /// Extract `archive_path` into `dest_dir`. Returns the written files.
    pub fn extract(&self, archive_path: &Path, dest_dir: &Path, base_name: &str) -> Result<Vec<PathBuf>, BuildError> {
        let file = File::open(archive_path)?;
        let mut archive = ZipArchive::new(file).map_err(|e| BuildError::archive(archive_path, e))?;

        fs::create_dir_all(dest_dir)?;
        let mut written = Vec::new();

        for i in 0..archive.len() {
            let mut member = archive
                .by_index(i)
                .map_err(|e| BuildError::archive(archive_path, e))?;

            let relative_path = match member.enclosed_name() {
                Some(path) => path.to_owned(),
                None => {
                    warn!("Skipping unsafe member {} in {}", member.name(), archive_path.display());
                    continue;
                }
            };

            if member.is_dir() {
                fs::create_dir_all(dest_dir.join(&relative_path))?;
                continue;
            }

            let output = self.output_name(&relative_path, base_name);
            if output != relative_path {
                debug!("Renamed {} to {}", relative_path.display(), output.display());
            }

            let absolute_path = dest_dir.join(&output);
            if let Some(parent) = absolute_path.parent() {
                fs::create_dir_all(parent)?;
            }

            let mut outfile = File::create(&absolute_path)?;
            io::copy(&mut member, &mut outfile)?;
            written.push(absolute_path);
        }

        Ok(written)
    }
}
