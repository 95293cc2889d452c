//! Application-id Stamping
//!
//! Archive manifests may reference the consuming application's package
//! through a placeholder token. Staging replaces it with the real package
//! name and rewrites the file only when something changed.

use std::path::Path;

use tracing::debug;

use crate::manifest::LibraryManifest;
use crate::parser::{ManifestParser, ParseError};

/// Replace every `token` in `text`. Returns `None` when nothing matched.
pub fn stamp_application_id(text: &str, token: &str, app_package: &str) -> Option<String> {
    if token.is_empty() || !text.contains(token) {
        return None;
    }
    Some(text.replace(token, app_package))
}

/// Manifest read from disk after stamping
#[derive(Debug, Clone)]
pub struct StampedManifest {
    pub manifest: LibraryManifest,
    /// Whether the file on disk was rewritten
    pub rewritten: bool,
}

/// Stamp the manifest at `path` in place, then parse it
pub fn stamp_manifest_file(
    path: &Path,
    token: &str,
    app_package: &str,
) -> Result<StampedManifest, ParseError> {
    if !path.is_file() {
        return Err(ParseError::FileNotFound(path.to_path_buf()));
    }

    let original = std::fs::read_to_string(path)?;
    let (text, rewritten) = match stamp_application_id(&original, token, app_package) {
        Some(stamped) => {
            std::fs::write(path, &stamped)?;
            debug!("Stamped {} into {}", app_package, path.display());
            (stamped, true)
        }
        None => (original, false),
    };

    Ok(StampedManifest {
        manifest: ManifestParser::parse_string(&text)?,
        rewritten,
    })
}
