//! Environment and version report shown by `info` and the webtools page.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionKind {
    Versions,
    Environment,
    Directories,
    Uris,
}

impl SectionKind {
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Versions => "Versions",
            Self::Environment => "Environment",
            Self::Directories => "Directories",
            Self::Uris => "URIs",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoSection {
    pub kind: SectionKind,
    pub title: &'static str,
    pub entries: Vec<InfoEntry>,
}

impl InfoSection {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            title: kind.title(),
            entries: Vec::new(),
        }
    }

    /// Append `key: value`; `None` values are omitted.
    pub fn push(&mut self, key: &str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            let value = value.into();
            if !value.trim().is_empty() {
                self.entries.push(InfoEntry {
                    key: key.to_string(),
                    value,
                });
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InfoReport {
    pub sections: Vec<InfoSection>,
}

impl InfoReport {
    pub fn section(&self, kind: SectionKind) -> Option<&InfoSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

/// Facts about the host runtime. Anything that could not be determined is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFacts {
    pub os: Option<String>,
    pub framework_version: Option<String>,
    pub php_version: Option<String>,
    pub php_sapi: Option<String>,
    pub php_binary: Option<String>,
    pub php_extension_dir: Option<String>,
    pub php_bin_dir: Option<String>,
    pub php_ini: Option<String>,
}

/// Directories and URIs known for the current project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryLayout {
    pub devtools_path: Option<String>,
    pub templates_path: Option<String>,
    pub application_path: Option<String>,
    pub controllers_dir: Option<String>,
    pub models_dir: Option<String>,
    pub migrations_dir: Option<String>,
    pub views_dir: Option<String>,
    pub base_uri: Option<String>,
}
