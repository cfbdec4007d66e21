//! One module per subcommand. Handlers translate arguments into core calls
//! and print results; no business logic lives here.

pub mod completions;
pub mod config;
pub mod info;
pub mod models;
pub mod project;
pub mod webtools;

use std::path::{Path, PathBuf};

use devtools_adapters::{PathResolver, config_scanner};
use devtools_core::domain::ProjectConfig;

use crate::error::CliResult;

/// `--directory`, else the current directory.
pub(crate) fn project_root(directory: Option<&Path>) -> CliResult<PathBuf> {
    match directory {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Ok(PathResolver::current()?.root().to_path_buf()),
    }
}

/// The application config at `explicit`, or the one found under `root`.
/// A relative `explicit` path is taken relative to `root`.
pub(crate) fn load_project_config(
    root: &Path,
    explicit: Option<&Path>,
) -> CliResult<ProjectConfig> {
    let resolver = PathResolver::new(root);
    let loaded = match explicit {
        Some(path) => {
            config_scanner::load_file(&resolver.resolve(&path.to_string_lossy()))?
        }
        None => resolver.load_config()?,
    };
    tracing::debug!(path = %loaded.path().display(), "Application config loaded");
    Ok(loaded.project_config()?)
}
