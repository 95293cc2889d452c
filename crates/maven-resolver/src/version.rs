//! Version Ordering
//!
//! Packs dotted versions into a comparable 32-bit ordinal and reduces
//! Maven range expressions to a single concrete version token. Neither
//! operation can fail: a malformed version simply compares as old.

use std::fmt;

use serde::Serialize;

/// Comparable form of a dotted version string.
///
/// Up to four components are packed one per byte, the first in the
/// highest byte. Parsing stops at the first non-numeric component and
/// keeps what was packed so far, so `"abc"` is 0 and `"1.0-rc1"` is the
/// same as `"1"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct VersionOrdinal(u32);

impl VersionOrdinal {
    pub fn parse(version: &str) -> Self {
        let mut value = 0u32;

        for (index, section) in version.split('.').take(4).enumerate() {
            let Ok(component) = section.trim().parse::<u32>() else {
                break;
            };
            // Oversized components only disturb their own byte
            value |= (component & 0xFF) << (24 - 8 * index);
        }

        VersionOrdinal(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<&str> for VersionOrdinal {
    fn from(version: &str) -> Self {
        VersionOrdinal::parse(version)
    }
}

impl fmt::Display for VersionOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Result of reducing a version expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedVersion {
    /// Digits and dots only
    Clean(String),
    /// Could not be reduced; carries the original expression unchanged
    Unparsable(String),
}

impl NormalizedVersion {
    pub fn as_str(&self) -> &str {
        match self {
            NormalizedVersion::Clean(v) | NormalizedVersion::Unparsable(v) => v,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            NormalizedVersion::Clean(v) | NormalizedVersion::Unparsable(v) => v,
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, NormalizedVersion::Clean(_))
    }
}

/// Reduce a Maven version expression such as `[1.0,2.0)` to one version.
///
/// For comma lists the rightmost element containing a digit or `.` wins,
/// matching the convention of listing the preferred version last.
pub fn normalize_version_expression(expression: &str) -> NormalizedVersion {
    let mut working = expression;

    if expression.contains(',') {
        if let Some(candidate) = expression
            .split(',')
            .rev()
            .find(|part| part.chars().any(|c| c.is_ascii_digit() || c == '.'))
        {
            working = candidate;
        }
    }

    let stripped: String = working
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '[' | ']'))
        .collect();

    if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit() || c == '.') {
        NormalizedVersion::Clean(stripped)
    } else {
        NormalizedVersion::Unparsable(expression.to_string())
    }
}
