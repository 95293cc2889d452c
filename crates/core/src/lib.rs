//! aarstage Core - configuration and shared types
//!
//! This crate provides what every stage of the packaging pass shares:
//! the hard error type, the non-fatal diagnostics collection, the stager
//! configuration and the import list format.

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod imports;

pub use config::{DEFAULT_APPLICATION_ID_TOKEN, StagerConfig, LayoutConfig, StagingConfig, AndroidConfig, RepositoryScan};
pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{AarStageError, Result};
pub use imports::{ImportDirective, ImportList, ImportVariables, PackageImport};

/// aarstage version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "aarstage";
