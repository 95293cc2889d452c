//! Android Toolchain Detection
//!
//! Locates an installed Android SDK and the Maven repositories it ships,
//! so import lists can refer to `$(ANDROID_HOME)`.

pub mod detector;

pub use detector::{ToolchainDetector, SdkInfo, DetectionError};

/// Maven repositories bundled with the SDK extras, relative to the SDK root
pub const SDK_MAVEN_REPOSITORIES: &[&[&str]] = &[
    &["extras", "android", "m2repository"],
    &["extras", "google", "m2repository"],
];
