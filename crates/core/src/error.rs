//! Error types for aarstage
//!
//! Centralized error handling using thiserror. Only hard failures live
//! here; per-package resolution problems are reported as diagnostics.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for aarstage
#[derive(Error, Debug)]
pub enum AarStageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Import list {path} could not be read: {source}")]
    ImportList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for aarstage operations
pub type Result<T> = std::result::Result<T, AarStageError>;

impl AarStageError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            AarStageError::Io(e) => format!("File operation failed: {}", e),
            AarStageError::Config(msg) => format!("Configuration error: {}", msg),
            AarStageError::ImportList { path, .. } => {
                format!("Unable to read import list {}", path.display())
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let err = AarStageError::ImportList {
            path: PathBuf::from("aar-imports.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.user_message(), "Unable to read import list aar-imports.txt");

        let err = AarStageError::Config("bad layout".into());
        assert_eq!(err.user_message(), "Configuration error: bad layout");
    }
}
