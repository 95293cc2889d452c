//! AndroidManifest.xml Parser
//!
//! Streams the manifest with quick-xml and keeps only the attributes in
//! [`LibraryManifest`].

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::manifest::LibraryManifest;
use crate::ANDROID_NS;

/// Parser errors
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),
    #[error("Invalid manifest structure: {0}")]
    InvalidStructure(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Manifest parser
pub struct ManifestParser;

impl ManifestParser {
    /// Parse a manifest file from path
    pub fn parse_file(path: impl AsRef<Path>) -> Result<LibraryManifest, ParseError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ParseError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse_string(&content)
    }

    /// Parse manifest from string
    pub fn parse_string(xml: &str) -> Result<LibraryManifest, ParseError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut manifest = LibraryManifest::default();
        let mut android_prefix = String::from("android");
        let mut depth = 0usize;
        let mut saw_root = false;

        loop {
            let event = reader.read_event()?;
            let is_start = matches!(event, Event::Start(_));

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    match (depth, e.name().as_ref()) {
                        (0, b"manifest") => {
                            saw_root = true;
                            if let Some(prefix) = Self::android_prefix(e) {
                                android_prefix = prefix;
                            }
                            manifest.package = Self::get_attr(e, "package");
                            manifest.version_code = Self::get_prefixed_attr(e, &android_prefix, "versionCode");
                            manifest.version_name = Self::get_prefixed_attr(e, &android_prefix, "versionName");
                        }
                        (0, other) => {
                            return Err(ParseError::InvalidStructure(format!(
                                "expected <manifest> root, found <{}>",
                                String::from_utf8_lossy(other)
                            )));
                        }
                        (1, b"uses-sdk") => {
                            manifest.min_sdk = Self::get_prefixed_attr(e, &android_prefix, "minSdkVersion");
                            manifest.target_sdk = Self::get_prefixed_attr(e, &android_prefix, "targetSdkVersion");
                        }
                        _ => {}
                    }
                    if is_start {
                        depth += 1;
                    }
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_root {
            return Err(ParseError::InvalidStructure("missing <manifest> root element".into()));
        }
        if depth != 0 {
            return Err(ParseError::InvalidStructure("unexpected end of document".into()));
        }

        debug!(
            "Parsed manifest {} (minSdk {:?})",
            manifest.package.as_deref().unwrap_or("<unnamed>"),
            manifest.min_sdk
        );
        Ok(manifest)
    }

    /// Prefix bound to the Android namespace on this element, if any
    fn android_prefix(e: &BytesStart) -> Option<String> {
        e.attributes().filter_map(|a| a.ok()).find_map(|attr| {
            let key = std::str::from_utf8(attr.key.as_ref()).ok()?;
            let prefix = key.strip_prefix("xmlns:")?;
            let value = attr.unescape_value().ok()?;
            (value == ANDROID_NS).then(|| prefix.to_string())
        })
    }

    /// Get a `prefix:name` attribute
    fn get_prefixed_attr(e: &BytesStart, prefix: &str, name: &str) -> Option<String> {
        Self::get_attr(e, &format!("{}:{}", prefix, name))
    }

    /// Get an attribute by its qualified name
    fn get_attr(e: &BytesStart, name: &str) -> Option<String> {
        for attr in e.attributes().filter_map(|a| a.ok()) {
            let key = std::str::from_utf8(attr.key.as_ref()).ok()?;
            if key == name {
                return attr.unescape_value().ok().map(|s| s.into_owned());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android"
    package="com.example.libfoo"
    android:versionCode="3"
    android:versionName="1.0">

    <uses-sdk android:minSdkVersion="14" android:targetSdkVersion="26"/>

    <application>
        <activity android:name=".FooActivity">
            <uses-sdk android:minSdkVersion="99"/>
        </activity>
    </application>
</manifest>"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = ManifestParser::parse_string(SAMPLE_MANIFEST).unwrap();

        assert_eq!(manifest.package.as_deref(), Some("com.example.libfoo"));
        assert_eq!(manifest.version_code.as_deref(), Some("3"));
        assert_eq!(manifest.version_name.as_deref(), Some("1.0"));
        // Nested uses-sdk elements are not the manifest's own
        assert_eq!(manifest.min_sdk.as_deref(), Some("14"));
        assert_eq!(manifest.target_sdk.as_deref(), Some("26"));
    }

    #[test]
    fn test_custom_namespace_prefix() {
        let xml = r#"<manifest xmlns:a="http://schemas.android.com/apk/res/android" package="p">
            <uses-sdk a:minSdkVersion="21"/>
        </manifest>"#;
        let manifest = ManifestParser::parse_string(xml).unwrap();
        assert_eq!(manifest.min_sdk.as_deref(), Some("21"));
    }

    #[test]
    fn test_without_uses_sdk() {
        let manifest = ManifestParser::parse_string(r#"<manifest package="p"/>"#).unwrap();
        assert_eq!(manifest.min_sdk, None);
        assert_eq!(manifest.min_sdk_or("9"), "9");
    }

    #[test]
    fn test_malformed_manifest() {
        assert!(ManifestParser::parse_string("").is_err());
        assert!(ManifestParser::parse_string("<manifest><application>").is_err());
        assert!(ManifestParser::parse_string("<resources/>").is_err());
        assert!(ManifestParser::parse_string("<manifest></application></manifest>").is_err());
    }

    #[test]
    fn test_parse_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = ManifestParser::parse_file(dir.path().join("AndroidManifest.xml")).unwrap_err();
        assert!(matches!(err, ParseError::FileNotFound(_)));
    }
}
