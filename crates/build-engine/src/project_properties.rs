//! Legacy Project Descriptor
//!
//! `project.properties` marks a staged archive as an Android library
//! project and points at the sibling projects it depends on.

use std::path::{Path, PathBuf};

/// Descriptor file name inside each staging directory
pub const FILE_NAME: &str = "project.properties";

/// Contents of one `project.properties`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyProjectDescriptor {
    pub min_sdk: String,
    /// Sibling staging directory names, in reference order
    pub references: Vec<String>,
}

impl LegacyProjectDescriptor {
    pub fn new(min_sdk: impl Into<String>) -> Self {
        Self {
            min_sdk: min_sdk.into(),
            references: Vec::new(),
        }
    }

    pub fn add_reference(&mut self, staged_name: impl Into<String>) {
        self.references.push(staged_name.into());
    }

    pub fn render(&self) -> String {
        let mut out = format!("target=android-{}\nandroid.library=true\n", self.min_sdk);
        for (index, reference) in self.references.iter().enumerate() {
            out.push_str(&format!("android.library.reference.{}=../{}\n", index + 1, reference));
        }
        out
    }

    /// Write into `staging_dir`, returning the file path
    pub fn write(&self, staging_dir: &Path) -> std::io::Result<PathBuf> {
        let path = staging_dir.join(FILE_NAME);
        std::fs::write(&path, self.render())?;
        Ok(path)
    }
}
