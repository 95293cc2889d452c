//! Stager Configuration
//!
//! Manages all packaging settings including:
//! - Repository roots and recursive repository scans
//! - Import list locations
//! - Output layout of the staged build tree
//! - Archive staging rules

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use tracing::{info, debug};

use crate::error::{AarStageError, Result};

/// Directory-name fragment identifying Maven repositories inside an SDK
pub const DEFAULT_REPOSITORY_PATTERN: &str = "m2repository";

/// Placeholder used by archive manifests for the application package
pub const DEFAULT_APPLICATION_ID_TOKEN: &str = "${applicationId}";

/// A directory tree searched for repository roots
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryScan {
    /// Directory to walk
    pub path: PathBuf,
    /// Any directory whose name contains this becomes a repository root
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_pattern() -> String {
    DEFAULT_REPOSITORY_PATTERN.to_string()
}

/// Output layout, relative to the build directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Where archive packages are extracted
    pub java_libs_dir: PathBuf,
    /// Where library packages are copied
    pub libs_dir: PathBuf,
    /// List of extracted archives, written after staging
    pub extract_list: PathBuf,
    /// Generated Gradle dependency imports
    pub gradle_imports: PathBuf,
    /// Root of the generated Gradle projects
    pub gradle_dir: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            java_libs_dir: PathBuf::from("JavaLibs"),
            libs_dir: PathBuf::from("libs"),
            extract_list: PathBuf::from("JavaLibs").join("AARExtractList.txt"),
            gradle_imports: PathBuf::from("gradle").join("app").join("aar-imports.gradle"),
            gradle_dir: PathBuf::from("gradle"),
        }
    }
}

/// Archive staging rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    /// Member names containing one of these get the archive name prefixed
    pub collision_markers: Vec<String>,
    /// Minimum platform version used when the manifest gives none
    pub default_min_sdk: String,
    /// Placeholder in archive manifests replaced by the app package
    pub application_id_token: String,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            collision_markers: vec!["libgpg.a".to_string()],
            default_min_sdk: "9".to_string(),
            application_id_token: DEFAULT_APPLICATION_ID_TOKEN.to_string(),
        }
    }
}

/// Android environment used for import list expansion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidConfig {
    /// Value for `$(ANDROID_HOME)`; detected when unset
    pub android_home: Option<PathBuf>,
    /// Value for `$(ENGINEDIR)`
    pub engine_dir: Option<PathBuf>,
}

/// Main stager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagerConfig {
    /// Configuration version for migrations
    pub version: u32,
    /// Repository roots added before any import list
    pub repositories: Vec<PathBuf>,
    /// Trees scanned for repository roots
    pub repository_scans: Vec<RepositoryScan>,
    /// Import lists read in order
    pub imports: Vec<PathBuf>,
    /// Output layout
    pub layout: LayoutConfig,
    /// Staging rules
    pub staging: StagingConfig,
    /// Android environment
    pub android: AndroidConfig,
}

impl Default for StagerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            repositories: Vec::new(),
            repository_scans: Vec::new(),
            imports: Vec::new(),
            layout: LayoutConfig::default(),
            staging: StagingConfig::default(),
            android: AndroidConfig::default(),
        }
    }
}

impl StagerConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "aarstage", "aarstage")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the configuration file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_file = Self::config_file()
            .ok_or_else(|| AarStageError::Config("Cannot determine config path".into()))?;
        Self::load_from(&config_file)
    }

    /// Load configuration from a file, falling back to defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {:?}", path);
            let contents = std::fs::read_to_string(path)?;
            let config: StagerConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            info!("Config file {:?} not found, using defaults", path);
            Ok(StagerConfig::default())
        }
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    /// Add a repository root unless it is already listed
    pub fn add_repository(&mut self, path: PathBuf) {
        if !self.repositories.contains(&path) {
            self.repositories.push(path);
        }
    }
}
