//! Loads a project skeleton from a `--template-path` directory.
//!
//! # Directory layout expected
//!
//! ```text
//! <template_path>/
//! └── project/
//!     ├── simple/
//!     │   ├── template.toml        ← manifest (optional)
//!     │   ├── .phalcon/
//!     │   ├── app/config/config.ini
//!     │   └── public/index.php
//!     └── micro/
//!         └── ...
//! ```
//!
//! # `template.toml` format
//!
//! ```toml
//! [template]
//! name        = "Company skeleton"   # optional, defaults to "<flavor> project"
//! description = "Internal layout"    # optional
//! version     = "2.1.0"              # optional
//!
//! # Optional per-file overrides. Files not listed are auto-detected:
//! # content containing {{ is parameterized, anything else literal.
//! [[files]]
//! path       = "public/index.php"
//! type       = "literal"             # literal | parameterized
//! executable = false                 # optional
//!
//! # Directories created even when empty on disk.
//! [[directories]]
//! path = "app/cache"
//! ```
//!
//! Conditional files (`config.ini`/`config.php`, `.phtml`/`.volt` views,
//! `webtools*`) are recognised by path exactly as in the built-in skeletons.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use devtools_core::{
    application::ApplicationError,
    domain::{
        DirectorySpec, DomainError, FileSpec, Flavor, RelativePath, Template, TemplateContent,
        TemplateMetadata, TemplateNode, TemplateSource, TemplateTree,
    },
    error::DevtoolsResult,
};

const MANIFEST: &str = "template.toml";

// ── Manifest types ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Clone)]
pub struct TemplateManifest {
    #[serde(default)]
    pub template: ManifestInfo,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub directories: Vec<DirectoryEntry>,
}

/// `[template]` section.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ManifestInfo {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
}

/// One entry under `[[files]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct FileEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub file_type: Option<FileType>,
    #[serde(default)]
    pub executable: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Literal,
    Parameterized,
}

/// One entry under `[[directories]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryEntry {
    pub path: String,
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Reads `<template_path>/project/<flavor>/` into a [`Template`].
#[derive(Debug, Clone)]
pub struct FilesystemTemplateLoader {
    template_path: PathBuf,
}

impl FilesystemTemplateLoader {
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
        }
    }

    /// Directory holding the skeleton for `flavor`.
    pub fn flavor_dir(&self, flavor: Flavor) -> PathBuf {
        self.template_path.join("project").join(flavor.as_str())
    }

    /// # Errors
    ///
    /// [`ApplicationError::TemplateResolution`] when the flavor directory is
    /// missing; [`DomainError::InvalidTemplate`] when the manifest or a file
    /// cannot be read, or the directory holds nothing.
    #[instrument(skip(self), fields(template_path = %self.template_path.display()))]
    pub fn load(&self, flavor: Flavor) -> DevtoolsResult<Template> {
        let dir = self.flavor_dir(flavor);
        if !dir.is_dir() {
            return Err(ApplicationError::TemplateResolution {
                reason: format!("'{}' is not a directory", dir.display()),
            }
            .into());
        }

        let manifest = read_manifest(&dir)?;
        let tree = build_tree(&dir, &manifest)?;
        debug!(nodes = tree.len(), "skeleton read from disk");

        let info = manifest.template;
        let mut metadata = TemplateMetadata::new(
            info.name.unwrap_or_else(|| format!("{flavor} project")),
        )
        .description(info.description.unwrap_or_default());
        if let Some(version) = info.version {
            metadata = metadata.version(version);
        }

        let template = Template::builder()
            .flavor(flavor)
            .metadata(metadata)
            .tree(tree)
            .build()?;
        Ok(template)
    }
}

fn read_manifest(dir: &Path) -> Result<TemplateManifest, DomainError> {
    let path = dir.join(MANIFEST);
    if !path.exists() {
        return Ok(TemplateManifest::default());
    }

    let raw = fs::read_to_string(&path).map_err(|e| {
        DomainError::InvalidTemplate(format!("failed to read '{}': {e}", path.display()))
    })?;
    toml::from_str(&raw).map_err(|e| {
        DomainError::InvalidTemplate(format!("failed to parse '{}': {e}", path.display()))
    })
}

/// Manifest directories first, then every entry on disk in file-name order.
fn build_tree(dir: &Path, manifest: &TemplateManifest) -> Result<TemplateTree, DomainError> {
    let mut tree = TemplateTree::new();
    let mut seen: HashSet<String> = HashSet::new();

    for entry in &manifest.directories {
        let path = normalize_path(&entry.path);
        if seen.insert(path.clone()) {
            tree.push(TemplateNode::Directory(DirectorySpec::new(
                RelativePath::try_new(path)?,
            )));
        }
    }

    let overrides: HashMap<String, &FileEntry> = manifest
        .files
        .iter()
        .map(|f| (normalize_path(&f.path), f))
        .collect();

    for walk_entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let walk_entry = walk_entry
            .map_err(|e| DomainError::InvalidTemplate(format!("directory walk error: {e}")))?;
        let rel = walk_entry.path().strip_prefix(dir).map_err(|_| {
            DomainError::InvalidTemplate(format!(
                "'{}' is outside '{}'",
                walk_entry.path().display(),
                dir.display()
            ))
        })?;
        if rel.as_os_str() == MANIFEST {
            continue;
        }

        let path = normalize_path(&rel.to_string_lossy());
        if !seen.insert(path.clone()) {
            continue;
        }

        if walk_entry.file_type().is_dir() {
            tree.push(TemplateNode::Directory(DirectorySpec::new(
                RelativePath::try_new(path)?,
            )));
        } else if walk_entry.file_type().is_file() {
            let content = fs::read_to_string(walk_entry.path()).map_err(|e| {
                DomainError::InvalidTemplate(format!("failed to read '{path}': {e}"))
            })?;
            let entry = overrides.get(&path).copied();
            tree.push(TemplateNode::File(file_node(&path, content, entry)?));
        }
    }

    Ok(tree)
}

/// An explicit manifest `type` wins; otherwise `{{` marks a parameterized file.
fn file_node(
    path: &str,
    content: String,
    entry: Option<&FileEntry>,
) -> Result<FileSpec, DomainError> {
    let file_type = entry.and_then(|e| e.file_type).unwrap_or(if content.contains("{{") {
        FileType::Parameterized
    } else {
        FileType::Literal
    });

    let source = TemplateSource::from(content);
    let content = match file_type {
        FileType::Literal => TemplateContent::Literal(source),
        FileType::Parameterized => TemplateContent::Parameterized(source),
    };

    let spec = FileSpec::new(RelativePath::try_new(path)?, content);
    Ok(if entry.is_some_and(|e| e.executable) {
        spec.executable()
    } else {
        spec
    })
}

/// Forward slashes everywhere so manifest paths match on every platform.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}
