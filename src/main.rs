//! aarstage CLI
//!
//! Entry point for the packaging steps: staging archives for legacy
//! builds, generating Gradle imports, and inspecting the resolved graph.

use std::path::PathBuf;

use aarstage::commands::{
    DumpCommand, GradleImportsCommand, GradleProjectsCommand, InitConfigCommand, StageCommand,
};
use aarstage::core::{Diagnostics, StagerConfig, APP_NAME, VERSION};
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aarstage")]
#[command(author, version, about = "Android archive dependency resolver and stager")]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Extra repository root, searched after configured ones
    #[arg(long = "repository", global = true)]
    repositories: Vec<PathBuf>,

    /// Value for $(ENGINEDIR) in import lists
    #[arg(long, global = true)]
    engine_dir: Option<PathBuf>,

    /// Value for $(ANDROID_HOME) in import lists
    #[arg(long, global = true)]
    android_home: Option<PathBuf>,

    /// Exit with an error if any diagnostic was recorded
    #[arg(long, global = true)]
    strict: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve imports, extract archives and copy libraries
    Stage {
        /// Import list files
        #[arg(long = "imports", short = 'i')]
        imports: Vec<PathBuf>,

        /// Build directory receiving JavaLibs and libs
        #[arg(long)]
        build_dir: PathBuf,

        /// Application package substituted into archive manifests
        #[arg(long)]
        package: String,
    },

    /// Write aar-imports.gradle for Gradle builds
    GradleImports {
        #[arg(long = "imports", short = 'i')]
        imports: Vec<PathBuf>,

        #[arg(long)]
        build_dir: PathBuf,
    },

    /// Convert staged archives into Gradle library modules
    GradleProjects {
        #[arg(long)]
        build_dir: PathBuf,

        #[arg(long)]
        compile_sdk: String,

        #[arg(long)]
        build_tools: String,
    },

    /// Resolve imports and print the dependency graph
    Dump {
        #[arg(long = "imports", short = 'i')]
        imports: Vec<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Only resolve the listed packages
        #[arg(long)]
        direct: bool,
    },

    /// Write the effective configuration to a TOML file
    InitConfig {
        /// Output file (defaults to the platform config file)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    debug!("{} v{}", APP_NAME, VERSION);

    let config = load_config(&cli)?;
    let strict = cli.strict;

    let diagnostics = match cli.command {
        Commands::Stage {
            imports,
            build_dir,
            package,
        } => StageCommand {
            imports,
            build_dir,
            package,
        }
        .execute(config)?,
        Commands::GradleImports { imports, build_dir } => {
            GradleImportsCommand { imports, build_dir }.execute(config)?
        }
        Commands::GradleProjects {
            build_dir,
            compile_sdk,
            build_tools,
        } => GradleProjectsCommand {
            build_dir,
            compile_sdk,
            build_tools,
        }
        .execute(config)?,
        Commands::Dump {
            imports,
            json,
            direct,
        } => DumpCommand {
            imports,
            json,
            transitive: !direct,
        }
        .execute(config)?,
        Commands::InitConfig { output } => {
            InitConfigCommand { output }.execute(config)?;
            Diagnostics::new()
        }
    };

    report(&diagnostics, strict)
}

/// Configuration file overlaid with command-line values
fn load_config(cli: &Cli) -> Result<StagerConfig> {
    let mut config = match &cli.config {
        Some(path) => StagerConfig::load_from(path)?,
        None => StagerConfig::load()?,
    };

    for repository in &cli.repositories {
        config.add_repository(repository.clone());
    }
    if let Some(engine_dir) = &cli.engine_dir {
        config.android.engine_dir = Some(engine_dir.clone());
    }
    if let Some(android_home) = &cli.android_home {
        config.android.android_home = Some(android_home.clone());
    }

    Ok(config)
}

fn report(diagnostics: &Diagnostics, strict: bool) -> Result<()> {
    if diagnostics.is_empty() {
        return Ok(());
    }

    info!("{} problem(s) recorded", diagnostics.len());
    if strict {
        bail!("{} diagnostic(s) recorded in strict mode", diagnostics.len());
    }
    Ok(())
}
