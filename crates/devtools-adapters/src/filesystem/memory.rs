//! In-memory filesystem for service-level tests and dry runs.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use devtools_core::{
    application::{ApplicationError, ports::Filesystem},
    error::DevtoolsResult,
};

/// Shared, cloneable file tree. Clones observe the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<Tree>>,
}

#[derive(Debug, Default)]
struct Tree {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    executables: BTreeSet<PathBuf>,
    /// Writes below this path fail, to exercise rollback.
    read_only: Option<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file (and its parents), e.g. a model that already exists.
    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        if let Ok(mut tree) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                tree.add_ancestors(parent);
            }
            tree.files.insert(path.to_path_buf(), content.into());
        }
        self
    }

    /// Make every write under `path` fail.
    pub fn read_only_below(self, path: impl Into<PathBuf>) -> Self {
        if let Ok(mut tree) = self.inner.write() {
            tree.read_only = Some(path.into());
        }
        self
    }

    pub fn read_file(&self, path: &Path) -> Option<String> {
        self.read().ok()?.files.get(path).cloned()
    }

    pub fn is_executable(&self, path: &Path) -> bool {
        self.read()
            .map(|tree| tree.executables.contains(path))
            .unwrap_or(false)
    }

    /// All file paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read()
            .map(|tree| tree.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn file_count(&self) -> usize {
        self.read().map(|tree| tree.files.len()).unwrap_or(0)
    }

    fn read(&self) -> DevtoolsResult<RwLockReadGuard<'_, Tree>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    fn write(&self) -> DevtoolsResult<RwLockWriteGuard<'_, Tree>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }
}

impl Tree {
    fn add_ancestors(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn check_writable(&self, path: &Path) -> DevtoolsResult<()> {
        match &self.read_only {
            Some(guarded) if path.starts_with(guarded) => Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "read-only filesystem".into(),
            }
            .into()),
            _ => Ok(()),
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> DevtoolsResult<()> {
        let mut tree = self.write()?;
        tree.check_writable(path)?;
        tree.add_ancestors(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> DevtoolsResult<()> {
        let mut tree = self.write()?;
        tree.check_writable(path)?;

        let parent_missing = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .is_some_and(|p| !tree.directories.contains(p));
        if parent_missing {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "parent directory does not exist".into(),
            }
            .into());
        }

        tree.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> DevtoolsResult<()> {
        let mut tree = self.write()?;
        if executable {
            tree.executables.insert(path.to_path_buf());
        } else {
            tree.executables.remove(path);
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.read()
            .map(|tree| tree.files.contains_key(path) || tree.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_dir_all(&self, path: &Path) -> DevtoolsResult<()> {
        let mut tree = self.write()?;
        tree.directories.retain(|p| !p.starts_with(path));
        tree.files.retain(|p, _| !p.starts_with(path));
        tree.executables.retain(|p| !p.starts_with(path));
        Ok(())
    }
}
