use super::DomainError;
use std::fmt;
use std::path::{Path, PathBuf};

/// A path inside a generated project, guaranteed to be relative.
///
/// Invariant: never absolute. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// # Panics
    /// Panics if the path is absolute. Built-in skeletons use this; anything
    /// read from disk goes through [`RelativePath::try_new`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        assert!(
            !path.is_absolute(),
            "RelativePath cannot be absolute: {:?}",
            path
        );
        Self(path)
    }

    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_absolute() {
            Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            })
        } else {
            Ok(Self(path))
        }
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Forward-slash form, stable across platforms.
    pub fn as_str(&self) -> String {
        self.0
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|n| n.to_str())
    }

    pub fn extension(&self) -> Option<&str> {
        self.0.extension().and_then(|e| e.to_str())
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

/// Capability-based permissions model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    executable: bool,
}

impl Permissions {
    pub const fn read_write() -> Self {
        Self { executable: false }
    }

    /// Entry scripts such as `run` in cli skeletons.
    pub const fn executable() -> Self {
        Self { executable: true }
    }

    pub const fn executable_flag(&self) -> bool {
        self.executable
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::read_write()
    }
}
