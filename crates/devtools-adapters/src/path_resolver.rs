//! Project root handling and config lookup.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use devtools_core::{
    application::ApplicationError,
    error::DevtoolsResult,
};

use crate::config_scanner::{self, CONFIG_EXTENSIONS, CONFIG_NAME, ConfigScanner, LoadedConfig};

/// Directories never descended into by [`PathResolver::find_config`].
const SKIPPED_DIRS: [&str; 3] = ["vendor", "node_modules", ".git"];

/// Holds the project root all relative paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Rooted at the current working directory.
    pub fn current() -> DevtoolsResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| ApplicationError::FilesystemError {
            path: PathBuf::from("."),
            reason: format!("cannot read the current directory: {e}"),
        })?;
        Ok(Self::new(cwd))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `sub` joined onto the root. Leading and trailing separators of either
    /// flavor are ignored, so `"/app/models/"` and `"app\\models"` agree.
    pub fn root_path(&self, sub: &str) -> PathBuf {
        let mut path = self.root.clone();
        for part in split_components(sub) {
            path.push(part);
        }
        path
    }

    /// A path is absolute if it starts with a drive letter on Windows, or
    /// with `/` elsewhere.
    pub fn is_absolute(path: &str) -> bool {
        if cfg!(windows) {
            let bytes = path.as_bytes();
            bytes.len() >= 3
                && bytes[0].is_ascii_alphabetic()
                && bytes[1] == b':'
                && (bytes[2] == b'\\' || bytes[2] == b'/')
        } else {
            path.starts_with('/')
        }
    }

    /// Resolve `path` against the root unless it is already absolute.
    pub fn resolve(&self, path: &str) -> PathBuf {
        if Self::is_absolute(path) {
            PathBuf::from(path)
        } else {
            self.root_path(path)
        }
    }

    /// First `config.<ext>` anywhere below the root, in file-name order.
    pub fn find_config(&self) -> Option<PathBuf> {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || entry
                        .file_name()
                        .to_str()
                        .is_none_or(|name| !SKIPPED_DIRS.contains(&name))
            })
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .find(|entry| is_config_file(entry.path()))
            .map(|entry| entry.into_path())
    }

    /// Scanner directories first, then the recursive fallback.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load_config(&self) -> DevtoolsResult<LoadedConfig> {
        let scanner = ConfigScanner::new(&self.root);
        if let Some(loaded) = scanner.scan(CONFIG_NAME)? {
            return Ok(loaded);
        }

        match self.find_config() {
            Some(path) => {
                debug!(path = %path.display(), "config found by directory walk");
                config_scanner::load_file(&path)
            }
            None => Err(ApplicationError::ConfigurationNotFound {
                scanned: scanner.config_dirs(),
            }
            .into()),
        }
    }
}

fn split_components(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
}

fn is_config_file(path: &Path) -> bool {
    let stem_matches = path.file_stem().and_then(|s| s.to_str()) == Some(CONFIG_NAME);
    let ext_matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| CONFIG_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    stem_matches && ext_matches
}
