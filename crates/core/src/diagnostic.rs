//! Diagnostics
//!
//! Non-fatal problems found while resolving or staging packages. A
//! diagnostic never stops the pass that produced it; it is logged when
//! recorded and kept so the caller can decide whether the build fails.

use std::fmt;

use serde::Serialize;
use tracing::error;

/// Kind of non-fatal problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Coordinate did not resolve to any repository directory
    NotFound,
    /// Package located but its descriptor file is absent
    DescriptorMissing,
    /// Descriptor present but not valid XML
    DescriptorParseError,
    /// Version expression could not be reduced to a numeric token
    VersionUnparsable,
    /// Archive manifest could not be read or parsed
    ManifestError,
    /// Archive or library binary could not be extracted or copied
    ArchiveError,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::NotFound => "not-found",
            DiagnosticKind::DescriptorMissing => "descriptor-missing",
            DiagnosticKind::DescriptorParseError => "descriptor-parse-error",
            DiagnosticKind::VersionUnparsable => "version-unparsable",
            DiagnosticKind::ManifestError => "manifest-error",
            DiagnosticKind::ArchiveError => "archive-error",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Package or file the problem is about
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.subject, self.message)
    }
}

/// Ordered collection of diagnostics
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it
    pub fn push(&mut self, diagnostic: Diagnostic) {
        error!(kind = %diagnostic.kind, "{}: {}", diagnostic.subject, diagnostic.message);
        self.entries.push(diagnostic);
    }

    /// Shorthand for `push(Diagnostic::new(..))`
    pub fn report(&mut self, kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) {
        self.push(Diagnostic::new(kind, subject, message));
    }

    /// Append already-logged diagnostics from another pass
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of diagnostics of the given kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
