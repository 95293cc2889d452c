//! Gradle Generation
//!
//! In Gradle mode the resolver runs without transitive reads and Gradle
//! pulls dependencies itself from the same repositories. This module
//! writes the import script for that, and converts previously staged
//! legacy projects into Gradle library modules.

use std::fs;
use std::path::{Path, PathBuf};

use aarstage_core::LayoutConfig;
use aarstage_manifest_manager::{LibraryManifest, ManifestParser, DEFAULT_MIN_SDK, MANIFEST_FILE_NAME};
use aarstage_maven_resolver::PackageCollection;
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::{BuildError, SOURCE_DIR};

/// Extra Gradle lines a staged archive may carry
pub const ADDITIONS_FILE: &str = "additions.gradle";

/// `aar-imports.gradle` generator
pub struct GradleImports;

impl GradleImports {
    pub fn render(repositories: &[PathBuf], archives: &PackageCollection) -> String {
        let mut out = String::from("repositories {\n");
        for repository in repositories {
            out.push_str(&format!("\tmaven {{ url uri('{}') }}\n", gradle_path(repository)));
        }
        out.push_str("}\n");

        out.push_str("dependencies {\n");
        for entry in archives {
            out.push_str(&format!(
                "\tcompile '{}:{}:{}'\n",
                entry.group, entry.artifact, entry.version
            ));
        }
        out.push_str("}\n");
        out
    }

    pub fn write(path: &Path, repositories: &[PathBuf], archives: &PackageCollection) -> Result<(), BuildError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, Self::render(repositories, archives))?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}

/// Absolute, forward-slashed form of `path`
fn gradle_path(path: &Path) -> String {
    let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    absolute.to_string_lossy().replace('\\', "/")
}

/// Remove a legacy staging tree left by a previous non-Gradle run.
///
/// The extract list is the marker. Returns whether anything was removed.
pub fn clean_previous_extraction(build_root: &Path, layout: &LayoutConfig) -> Result<bool, BuildError> {
    if !build_root.join(&layout.extract_list).is_file() {
        return Ok(false);
    }

    let java_libs = build_root.join(&layout.java_libs_dir);
    info!("Cleaning up {} from previous legacy staging", java_libs.display());
    fs::remove_dir_all(&java_libs)?;
    Ok(true)
}

/// Converts staged legacy projects into Gradle library modules
#[derive(Debug, Clone)]
pub struct GradleProjectConverter {
    compile_sdk: String,
    build_tools: String,
}

impl GradleProjectConverter {
    pub fn new(compile_sdk: impl Into<String>, build_tools: impl Into<String>) -> Self {
        Self {
            compile_sdk: compile_sdk.into(),
            build_tools: build_tools.into(),
        }
    }

    /// Convert every directory in `java_libs_dir` into a module under
    /// `gradle_dir`, then write `settings.gradle` and `app/projects.gradle`.
    ///
    /// Returns the module names in the order they were written.
    pub fn convert(&self, java_libs_dir: &Path, gradle_dir: &Path) -> Result<Vec<String>, BuildError> {
        let mut names = Vec::new();

        if java_libs_dir.is_dir() {
            let mut libs: Vec<PathBuf> = fs::read_dir(java_libs_dir)?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_dir())
                .collect();
            libs.sort();

            for lib_dir in libs {
                let Some(name) = lib_dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                    continue;
                };
                self.convert_one(&lib_dir, &gradle_dir.join(&name))?;
                names.push(name);
            }
        }

        let mut settings = String::from("include ':app'\n");
        let mut projects = String::from("dependencies {\n");
        for name in &names {
            settings.push_str(&format!("include ':{}'\n", name));
            projects.push_str(&format!("\tcompile project(':{}')\n", name));
        }
        projects.push_str("}\n");

        fs::create_dir_all(gradle_dir.join("app"))?;
        fs::write(gradle_dir.join("settings.gradle"), settings)?;
        fs::write(gradle_dir.join("app").join("projects.gradle"), projects)?;

        info!("Converted {} staged projects for Gradle", names.len());
        Ok(names)
    }

    fn convert_one(&self, lib_dir: &Path, project_dir: &Path) -> Result<(), BuildError> {
        let main_dir = project_dir.join("src").join("main");
        fs::create_dir_all(&main_dir)?;

        let manifest_path = lib_dir.join(MANIFEST_FILE_NAME);
        if manifest_path.is_file() {
            fs::copy(&manifest_path, main_dir.join(MANIFEST_FILE_NAME))?;
        }

        clean_copy_dir(&lib_dir.join("assets"), &project_dir.join("assets"))?;
        clean_copy_dir(&lib_dir.join("libs"), &project_dir.join("libs"))?;
        clean_copy_dir(&lib_dir.join("res"), &main_dir.join("res"))?;
        clean_copy_dir(&lib_dir.join(SOURCE_DIR), &main_dir.join("java"))?;

        let manifest = if manifest_path.is_file() {
            ManifestParser::parse_file(&manifest_path).unwrap_or_else(|e| {
                error!("AAR Manifest file {} parsing error! {}", manifest_path.display(), e);
                LibraryManifest::default()
            })
        } else {
            LibraryManifest::default()
        };

        let mut build_gradle = self.render_build_gradle(&manifest);
        let additions = lib_dir.join(ADDITIONS_FILE);
        if additions.is_file() {
            for line in fs::read_to_string(&additions)?.lines() {
                build_gradle.push_str(line);
                build_gradle.push('\n');
            }
        }

        fs::write(project_dir.join("build.gradle"), build_gradle)?;
        debug!("Wrote Gradle module {}", project_dir.display());
        Ok(())
    }

    pub fn render_build_gradle(&self, manifest: &LibraryManifest) -> String {
        let mut out = String::from("apply plugin: 'com.android.library'\nandroid {\n");
        out.push_str(&format!("\tcompileSdkVersion {}\n", self.compile_sdk));
        out.push_str(&format!("\tbuildToolsVersion \"{}\"\n", self.build_tools));
        out.push_str("\tdefaultConfig {\n");
        out.push_str(&format!("\t\tminSdkVersion {}\n", manifest.min_sdk_or(DEFAULT_MIN_SDK)));
        out.push_str(&format!("\t\ttargetSdkVersion {}\n", manifest.target_sdk_or(DEFAULT_MIN_SDK)));
        if let Some(code) = manifest.version_code.as_deref().filter(|c| !c.is_empty()) {
            out.push_str(&format!("\t\tversionCode {}\n", code));
        }
        if let Some(name) = manifest.version_name.as_deref().filter(|n| !n.is_empty()) {
            out.push_str(&format!("\t\tversionName \"{}\"\n", name));
        }
        out.push_str("\t}\n}\n");
        out
    }
}

/// Replace `dest` with a copy of `source`. A missing source leaves `dest` absent.
fn clean_copy_dir(source: &Path, dest: &Path) -> Result<(), BuildError> {
    if dest.exists() {
        fs::remove_dir_all(dest)?;
    }
    if !source.is_dir() {
        return Ok(());
    }

    for entry in WalkDir::new(source) {
        let entry = entry?;
        let relative = match entry.path().strip_prefix(source) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}
