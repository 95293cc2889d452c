//! Staging Session
//!
//! One packaging invocation: reads the import lists, resolves them into
//! a dependency graph, then stages the result either as extracted legacy
//! projects or as a Gradle import script.

use std::path::{Path, PathBuf};

use aarstage_android_toolchain::ToolchainDetector;
use aarstage_build_engine::{
    clean_previous_extraction, write_extract_list, ArchiveStager, GradleImports, LibraryCollector,
};
use aarstage_core::{Diagnostics, ImportDirective, ImportList, ImportVariables, StagerConfig};
use aarstage_maven_resolver::DependencyGraphBuilder;
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Variable naming the engine directory in import lists
pub const ENGINE_DIR_VARIABLE: &str = "ENGINEDIR";

/// Variable naming the Android SDK root in import lists
pub const ANDROID_HOME_VARIABLE: &str = "ANDROID_HOME";

/// Counts from one staging pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSummary {
    pub staged: usize,
    pub skipped: usize,
    pub copied: usize,
    pub extract_list: PathBuf,
}

/// Resolver plus the staging passes that consume it
pub struct StagingSession {
    config: StagerConfig,
    builder: DependencyGraphBuilder,
    diagnostics: Diagnostics,
}

impl StagingSession {
    pub fn new(config: StagerConfig) -> Self {
        Self {
            config,
            builder: DependencyGraphBuilder::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn config(&self) -> &StagerConfig {
        &self.config
    }

    pub fn builder(&self) -> &DependencyGraphBuilder {
        &self.builder
    }

    /// Variables available to import lists.
    ///
    /// `ANDROID_HOME` falls back to SDK detection when not configured.
    pub fn import_variables(&self) -> ImportVariables {
        let mut vars = ImportVariables::new();

        if let Some(engine_dir) = &self.config.android.engine_dir {
            vars.set(ENGINE_DIR_VARIABLE, engine_dir.to_string_lossy());
        }

        match self.android_home() {
            Some(path) => vars.set(ANDROID_HOME_VARIABLE, path.to_string_lossy()),
            None => debug!("No Android SDK found for $({})", ANDROID_HOME_VARIABLE),
        }

        vars
    }

    /// Configured SDK root, or the detected one
    fn android_home(&self) -> Option<PathBuf> {
        match &self.config.android.android_home {
            Some(path) => Some(path.clone()),
            None => ToolchainDetector::detect_sdk().ok().map(|sdk| sdk.path),
        }
    }

    /// Configured import lists followed by `extra`, merged in order
    pub fn load_imports(&self, extra: &[PathBuf]) -> Result<ImportList> {
        let vars = self.import_variables();
        let mut imports = ImportList::default();

        for path in self.config.imports.iter().chain(extra) {
            let list = ImportList::load(path, &vars)
                .with_context(|| format!("Failed to load import list {}", path.display()))?;
            debug!("Loaded {} directives from {}", list.len(), path.display());
            imports.merge(list);
        }

        Ok(imports)
    }

    /// Register configured repositories and the SDK's bundled ones, then
    /// apply `imports` in order
    pub fn resolve(&mut self, imports: &ImportList, resolve_transitive: bool) {
        for repository in &self.config.repositories {
            self.builder.add_repository(repository.clone());
        }
        for scan in &self.config.repository_scans {
            self.builder.add_repositories(&scan.path, &scan.pattern);
        }
        if let Some(sdk) = self.android_home() {
            for repository in ToolchainDetector::analyze_sdk(&sdk).maven_repositories {
                debug!("SDK repository {}", repository.display());
                self.builder.add_repository(repository);
            }
        }

        for directive in imports.directives() {
            match directive {
                ImportDirective::Repository(path) => {
                    self.builder.add_repository(path.clone());
                }
                ImportDirective::Repositories(path) => {
                    self.builder
                        .add_repositories(path, aarstage_core::config::DEFAULT_REPOSITORY_PATTERN);
                }
                ImportDirective::Package(package) => {
                    self.builder.add_new_archive(
                        &package.group,
                        &package.artifact,
                        &package.version,
                        resolve_transitive,
                    );
                }
            }
        }

        info!(
            "Resolved {} archives and {} libraries",
            self.builder.archives().len(),
            self.builder.libraries().len()
        );
    }

    /// Extract archives, copy libraries and record what was extracted
    pub fn stage(&mut self, build_root: &Path, app_package: &str) -> Result<StageSummary> {
        let layout = &self.config.layout;

        let mut stage = ArchiveStager::new(layout, &self.config.staging).stage(
            self.builder.archives(),
            build_root,
            app_package,
        );
        let mut collect = LibraryCollector::new(&layout.libs_dir).collect(self.builder.libraries(), build_root);

        let extract_list = build_root.join(&layout.extract_list);
        write_extract_list(self.builder.archives(), &extract_list)
            .with_context(|| format!("Failed to write {}", extract_list.display()))?;

        self.diagnostics.extend(std::mem::take(&mut stage.diagnostics));
        self.diagnostics.extend(std::mem::take(&mut collect.diagnostics));

        Ok(StageSummary {
            staged: stage.staged.len(),
            skipped: stage.skipped.len(),
            copied: collect.copied.len(),
            extract_list,
        })
    }

    /// Write the Gradle import script, clearing legacy staging first
    pub fn write_gradle_imports(&self, build_root: &Path) -> Result<PathBuf> {
        let layout = &self.config.layout;
        clean_previous_extraction(build_root, layout).context("Failed to clean legacy staging")?;

        let path = build_root.join(&layout.gradle_imports);
        GradleImports::write(&path, self.builder.repositories().roots(), self.builder.archives())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Every diagnostic from resolution and staging, in order
    pub fn diagnostics(&self) -> Diagnostics {
        let mut all = self.builder.diagnostics().clone();
        all.extend(self.diagnostics.clone());
        all
    }
}
