//! Disk-backed filesystem used by the `devtools` binary.

use std::io;
use std::path::Path;

use tracing::{debug, trace};

use devtools_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{DevtoolsError, DevtoolsResult},
};

/// Writes generated models and skeletons through `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> DevtoolsResult<()> {
        trace!(path = %path.display(), "mkdir -p");
        std::fs::create_dir_all(path).map_err(|e| io_failure(path, "create directory", e))
    }

    fn write_file(&self, path: &Path, content: &str) -> DevtoolsResult<()> {
        debug!(path = %path.display(), bytes = content.len(), "writing file");
        std::fs::write(path, content).map_err(|e| io_failure(path, "write file", e))
    }

    #[cfg(unix)]
    fn set_permissions(&self, path: &Path, executable: bool) -> DevtoolsResult<()> {
        use std::os::unix::fs::PermissionsExt;

        if !executable {
            return Ok(());
        }
        let mut perms = std::fs::metadata(path)
            .map_err(|e| io_failure(path, "read metadata", e))?
            .permissions();
        perms.set_mode(perms.mode() | 0o111);
        std::fs::set_permissions(path, perms).map_err(|e| io_failure(path, "chmod +x", e))
    }

    #[cfg(not(unix))]
    fn set_permissions(&self, _path: &Path, _executable: bool) -> DevtoolsResult<()> {
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> DevtoolsResult<()> {
        debug!(path = %path.display(), "removing directory tree");
        std::fs::remove_dir_all(path).map_err(|e| io_failure(path, "remove directory", e))
    }
}

fn io_failure(path: &Path, operation: &str, err: io::Error) -> DevtoolsError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("failed to {operation}: {err}"),
    }
    .into()
}
