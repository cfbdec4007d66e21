use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::{entities::common::Permissions, error::DomainError};

/// Rendered skeleton ready to be written under `root`.
///
/// Output of the template renderer; pure data.
#[derive(Debug, Clone)]
pub struct ProjectStructure {
    pub(crate) root: PathBuf,
    pub(crate) entries: Vec<FsEntry>,
}

impl ProjectStructure {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: String, perms: Permissions) {
        self.entries.push(FsEntry::File(FileToWrite {
            path: path.into(),
            content,
            permissions: perms,
        }));
    }

    pub fn add_directory(&mut self, path: impl Into<PathBuf>) {
        self.entries.push(FsEntry::Directory(DirectoryToCreate { path: path.into() }));
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.add_file(path, content.into(), Permissions::read_write());
        self
    }

    pub fn with_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_directory(path);
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.entries.is_empty() {
            return Err(DomainError::InvalidTemplate(
                "rendered project structure is empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            let path = entry.path();

            if path.is_absolute() {
                return Err(DomainError::AbsolutePathNotAllowed {
                    path: path.display().to_string(),
                });
            }

            if !seen.insert(path.to_path_buf()) {
                return Err(DomainError::DuplicatePath {
                    path: path.display().to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::File(f) => Some(f),
            _ => None,
        })
    }

    pub fn directories(&self) -> impl Iterator<Item = &DirectoryToCreate> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::Directory(d) => Some(d),
            _ => None,
        })
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&FileToWrite> {
        let path = path.as_ref();
        self.files().find(|f| f.path == path)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.entries.iter().any(|e| e.path() == path)
    }

    /// Absolute paths in write order (used for dry runs).
    pub fn planned_paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| self.root.join(e.path())).collect()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone)]
pub enum FsEntry {
    File(FileToWrite),
    Directory(DirectoryToCreate),
}

impl FsEntry {
    pub fn path(&self) -> &Path {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileToWrite {
    pub path: PathBuf,
    pub content: String,
    pub permissions: Permissions,
}

#[derive(Debug, Clone)]
pub struct DirectoryToCreate {
    pub path: PathBuf,
}
