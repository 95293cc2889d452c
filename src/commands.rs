//! CLI commands for aarstage
//!
//! Each command runs one packaging step and hands back the diagnostics
//! it produced, so the caller decides whether they fail the build.

use std::path::PathBuf;

use aarstage_build_engine::GradleProjectConverter;
use aarstage_core::{Diagnostics, StagerConfig};
use anyhow::Result;
use tracing::info;

use crate::session::StagingSession;

/// Resolve, extract and copy everything an application imports
pub struct StageCommand {
    pub imports: Vec<PathBuf>,
    pub build_dir: PathBuf,
    pub package: String,
}

impl StageCommand {
    pub fn execute(&self, config: StagerConfig) -> Result<Diagnostics> {
        let mut session = StagingSession::new(config);
        let imports = session.load_imports(&self.imports)?;
        session.resolve(&imports, true);

        let summary = session.stage(&self.build_dir, &self.package)?;
        info!(
            "Staged {} archives ({} already staged), copied {} libraries",
            summary.staged, summary.skipped, summary.copied
        );
        info!("Extract list written to {}", summary.extract_list.display());

        Ok(session.diagnostics())
    }
}

/// Write `aar-imports.gradle` for Gradle builds
pub struct GradleImportsCommand {
    pub imports: Vec<PathBuf>,
    pub build_dir: PathBuf,
}

impl GradleImportsCommand {
    pub fn execute(&self, config: StagerConfig) -> Result<Diagnostics> {
        let mut session = StagingSession::new(config);
        let imports = session.load_imports(&self.imports)?;
        session.resolve(&imports, false);

        let path = session.write_gradle_imports(&self.build_dir)?;
        info!("Gradle imports written to {}", path.display());

        Ok(session.diagnostics())
    }
}

/// Turn staged legacy projects into Gradle modules
pub struct GradleProjectsCommand {
    pub build_dir: PathBuf,
    pub compile_sdk: String,
    pub build_tools: String,
}

impl GradleProjectsCommand {
    pub fn execute(&self, config: StagerConfig) -> Result<Diagnostics> {
        let layout = &config.layout;
        let converter = GradleProjectConverter::new(&self.compile_sdk, &self.build_tools);
        let names = converter.convert(
            &self.build_dir.join(&layout.java_libs_dir),
            &self.build_dir.join(&layout.gradle_dir),
        )?;

        for name in &names {
            info!("Gradle module: {}", name);
        }
        Ok(Diagnostics::new())
    }
}

/// Resolve and print the dependency graph
pub struct DumpCommand {
    pub imports: Vec<PathBuf>,
    pub json: bool,
    pub transitive: bool,
}

impl DumpCommand {
    pub fn execute(&self, config: StagerConfig) -> Result<Diagnostics> {
        let mut session = StagingSession::new(config);
        let imports = session.load_imports(&self.imports)?;
        session.resolve(&imports, self.transitive);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&session.builder().snapshot())?);
        } else {
            print!("{}", session.builder().dump());
        }

        Ok(session.diagnostics())
    }
}

/// Write the effective configuration to a file
pub struct InitConfigCommand {
    pub output: Option<PathBuf>,
}

impl InitConfigCommand {
    pub fn execute(&self, config: StagerConfig) -> Result<PathBuf> {
        let path = match &self.output {
            Some(path) => path.clone(),
            None => StagerConfig::config_file()
                .ok_or_else(|| anyhow::anyhow!("Cannot determine config path"))?,
        };

        config.save_to(&path)?;
        info!("Configuration written to {}", path.display());
        Ok(path)
    }
}
