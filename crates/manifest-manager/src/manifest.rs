//! Library Manifest Data
//!
//! The handful of AndroidManifest.xml values staging needs from an
//! archive: its package, versioning and SDK levels.

/// Values read from an archive's AndroidManifest.xml
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryManifest {
    /// `package` attribute of `<manifest>`
    pub package: Option<String>,

    /// `android:versionCode`
    pub version_code: Option<String>,

    /// `android:versionName`
    pub version_name: Option<String>,

    /// `android:minSdkVersion` of the top-level `<uses-sdk>`
    pub min_sdk: Option<String>,

    /// `android:targetSdkVersion` of the top-level `<uses-sdk>`
    pub target_sdk: Option<String>,
}

impl LibraryManifest {
    /// Minimum SDK, or `default` when the manifest declares none
    pub fn min_sdk_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.min_sdk.as_deref().unwrap_or(default)
    }

    /// Target SDK, or `default` when the manifest declares none
    pub fn target_sdk_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.target_sdk.as_deref().unwrap_or(default)
    }
}
