//! Import Lists
//!
//! Parses `aar-imports.txt` style lists that feed the resolver:
//!
//! ```text
//! repository $(ENGINEDIR)/Build/Android/Java/repo
//! repositories $(ANDROID_HOME)/extras
//! com.google.android.gms,play-services-auth,11.0.4
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::{AarStageError, Result};

/// A package requested by an import list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageImport {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

/// One meaningful line of an import list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportDirective {
    /// `repository <path>`: a single repository root
    Repository(PathBuf),
    /// `repositories <path>`: scan a tree for repository roots
    Repositories(PathBuf),
    /// `<group>,<artifact>,<version>`
    Package(PackageImport),
}

/// Values for `$(NAME)` references in import lists
#[derive(Debug, Clone, Default)]
pub struct ImportVariables {
    values: BTreeMap<String, String>,
}

impl ImportVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable; trailing path separators are dropped
    pub fn set(&mut self, name: impl Into<String>, value: impl AsRef<str>) {
        let value = value.as_ref().trim_end_matches(['/', '\\']).to_string();
        self.values.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Expand every known `$(NAME)`; unknown references are left verbatim
    pub fn expand(&self, text: &str) -> String {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\(([A-Za-z_][A-Za-z0-9_]*)\)").expect("valid regex"));

        re.replace_all(text, |caps: &Captures<'_>| match self.values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
    }
}

/// Parsed import list
#[derive(Debug, Clone, Default)]
pub struct ImportList {
    directives: Vec<ImportDirective>,
}

impl ImportList {
    /// Parse import list text
    pub fn parse(text: &str, vars: &ImportVariables) -> Self {
        let mut list = ImportList::default();

        for line in text.split('\n') {
            let trimmed = line.trim_matches([' ', '\r']);

            if let Some(rest) = trimmed.strip_prefix("repository ") {
                list.directives.push(ImportDirective::Repository(Self::import_path(rest, vars)));
            } else if let Some(rest) = trimmed.strip_prefix("repositories ") {
                list.directives.push(ImportDirective::Repositories(Self::import_path(rest, vars)));
            } else {
                let sections: Vec<&str> = trimmed.split(',').collect();
                if sections.len() == 3 {
                    list.push_package(PackageImport {
                        group: sections[0].trim_matches(' ').to_string(),
                        artifact: sections[1].trim_matches(' ').to_string(),
                        version: sections[2].trim_matches(' ').to_string(),
                    });
                } else if !trimmed.is_empty() {
                    debug!("Ignoring import line: {}", trimmed);
                }
            }
        }

        list
    }

    /// Load and parse an import list file
    pub fn load(path: &Path, vars: &ImportVariables) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| AarStageError::ImportList {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text, vars))
    }

    /// Append another list; package lines already present are dropped
    pub fn merge(&mut self, other: ImportList) {
        for directive in other.directives {
            match directive {
                ImportDirective::Package(package) => self.push_package(package),
                other => self.directives.push(other),
            }
        }
    }

    pub fn directives(&self) -> &[ImportDirective] {
        &self.directives
    }

    /// Requested packages in list order
    pub fn packages(&self) -> impl Iterator<Item = &PackageImport> {
        self.directives.iter().filter_map(|d| match d {
            ImportDirective::Package(package) => Some(package),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    fn push_package(&mut self, package: PackageImport) {
        let directive = ImportDirective::Package(package);
        if !self.directives.contains(&directive) {
            self.directives.push(directive);
        }
    }

    fn import_path(raw: &str, vars: &ImportVariables) -> PathBuf {
        let raw = raw.trim_matches(' ').trim_end_matches(['/', '\\']);
        let expanded = vars.expand(raw);
        PathBuf::from(expanded.replace(['\\', '/'], &MAIN_SEPARATOR.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> ImportVariables {
        ImportVariables::new()
            .with("ENGINEDIR", "/engine/")
            .with("ANDROID_HOME", "/sdk")
    }

    #[test]
    fn test_parse_directives() {
        let text = "repository $(ENGINEDIR)/Build/repo/\r\n\
                    repositories $(ANDROID_HOME)/extras\n\
                    \n\
                    com.example, libfoo ,1.0\n\
                    this line is ignored\n";
        let list = ImportList::parse(text, &vars());

        let sep = MAIN_SEPARATOR;
        assert_eq!(
            list.directives(),
            &[
                ImportDirective::Repository(PathBuf::from(format!("{sep}engine{sep}Build{sep}repo"))),
                ImportDirective::Repositories(PathBuf::from(format!("{sep}sdk{sep}extras"))),
                ImportDirective::Package(PackageImport {
                    group: "com.example".into(),
                    artifact: "libfoo".into(),
                    version: "1.0".into(),
                }),
            ]
        );
    }

    #[test]
    fn test_unknown_variable_is_kept() {
        let expanded = vars().expand("$(NOPE)/x/$(ANDROID_HOME)");
        assert_eq!(expanded, "$(NOPE)/x//sdk");
    }

    #[test]
    fn test_merge_drops_duplicate_packages() {
        let mut list = ImportList::parse("com.example,libfoo,1.0\n", &vars());
        list.merge(ImportList::parse("com.example,libfoo,1.0\ncom.example,libbar,2.0\n", &vars()));

        let artifacts: Vec<_> = list.packages().map(|p| p.artifact.as_str()).collect();
        assert_eq!(artifacts, vec!["libfoo", "libbar"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ImportList::load(Path::new("/definitely/not/here.txt"), &vars()).unwrap_err();
        assert!(matches!(err, AarStageError::ImportList { .. }));
    }
}
