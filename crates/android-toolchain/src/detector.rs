//! Toolchain Detection
//!
//! Detects an existing Android SDK installation.

use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, debug};

use crate::SDK_MAVEN_REPOSITORIES;

/// Result of SDK detection
#[derive(Debug, Clone)]
pub struct SdkInfo {
    pub path: PathBuf,
    /// Bundled Maven repositories that exist on disk
    pub maven_repositories: Vec<PathBuf>,
}

/// Toolchain detection errors
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("SDK not found")]
    SdkNotFound,
}

/// Toolchain detector
pub struct ToolchainDetector;

impl ToolchainDetector {
    /// Detect Android SDK installation
    pub fn detect_sdk() -> Result<SdkInfo, DetectionError> {
        debug!("Detecting Android SDK...");

        for path in Self::sdk_candidates() {
            if Self::is_valid_sdk(&path) {
                info!("Found Android SDK at {:?}", path);
                return Ok(Self::analyze_sdk(&path));
            }
        }

        Err(DetectionError::SdkNotFound)
    }

    /// Describe an SDK at a known location
    pub fn analyze_sdk(path: &Path) -> SdkInfo {
        SdkInfo {
            path: path.to_path_buf(),
            maven_repositories: Self::maven_repositories(path),
        }
    }

    /// Bundled Maven repositories present under an SDK root
    pub fn maven_repositories(sdk: &Path) -> Vec<PathBuf> {
        SDK_MAVEN_REPOSITORIES
            .iter()
            .map(|segments| segments.iter().fold(sdk.to_path_buf(), |p, s| p.join(s)))
            .filter(|p| p.is_dir())
            .collect()
    }

    /// Get SDK path candidates
    fn sdk_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        // Environment variables
        if let Ok(android_home) = env::var("ANDROID_HOME") {
            candidates.push(PathBuf::from(android_home));
        }
        if let Ok(sdk_root) = env::var("ANDROID_SDK_ROOT") {
            candidates.push(PathBuf::from(sdk_root));
        }

        // Common Windows paths
        if cfg!(windows) {
            if let Some(local) = dirs::data_local_dir() {
                candidates.push(local.join("Android").join("Sdk"));
            }
            candidates.push(PathBuf::from(r"C:\Android\sdk"));
        }

        // Common Unix paths
        if cfg!(unix) {
            if let Some(home) = dirs::home_dir() {
                candidates.push(home.join("Android").join("Sdk"));
                candidates.push(home.join("Library").join("Android").join("sdk"));
                candidates.push(home.join("android-sdk"));
            }
            candidates.push(PathBuf::from("/opt/android-sdk"));
            candidates.push(PathBuf::from("/usr/local/android-sdk"));
        }

        candidates
    }

    /// Check if a path contains a valid SDK
    pub fn is_valid_sdk(path: &Path) -> bool {
        if !path.is_dir() {
            return false;
        }

        path.join("platforms").is_dir() || path.join("extras").is_dir()
    }
}
