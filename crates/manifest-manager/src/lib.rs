//! Android Manifest Manager
//!
//! Reads the AndroidManifest.xml bundled in each archive and stamps the
//! consuming application's package into it.

pub mod manifest;
pub mod parser;
pub mod placeholder;

pub use manifest::LibraryManifest;
pub use parser::{ManifestParser, ParseError};
pub use placeholder::{stamp_application_id, stamp_manifest_file, StampedManifest};

/// Android resource namespace
pub const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";

/// Manifest file name at the top of an archive
pub const MANIFEST_FILE_NAME: &str = "AndroidManifest.xml";

/// Minimum SDK assumed when a manifest cannot tell
pub const DEFAULT_MIN_SDK: &str = "9";
