//! Application config discovery.
//!
//! Probes a fixed list of directories under a base path for
//! `<name>.{ini,json,toml,yml,yaml}`, directory-major, and parses the first
//! readable match with the `config` crate into a nested key-value tree.

use std::{
    fs,
    path::{Path, PathBuf},
};

use config::{Config, FileFormat};
use tracing::{debug, instrument, trace};

use devtools_core::{
    application::ApplicationError,
    domain::ProjectConfig,
    error::DevtoolsResult,
};

/// Default config basename.
pub const CONFIG_NAME: &str = "config";

/// Candidate directories, relative to the base path, in probe order.
pub const CONFIG_DIRECTORIES: [&str; 7] = [
    "config",
    "app/config",
    "apps/config",
    "app/frontend/config",
    "apps/frontend/config",
    "app/backend/config",
    "apps/backend/config",
];

/// Extensions tried inside each directory, in probe order.
pub const CONFIG_EXTENSIONS: [&str; 5] = ["ini", "json", "toml", "yml", "yaml"];

/// Parser for a config file extension.
pub fn format_for(extension: &str) -> Option<FileFormat> {
    match extension.to_ascii_lowercase().as_str() {
        "ini" => Some(FileFormat::Ini),
        "json" => Some(FileFormat::Json),
        "toml" => Some(FileFormat::Toml),
        "yml" | "yaml" => Some(FileFormat::Yaml),
        _ => None,
    }
}

/// A parsed application config and the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    path: PathBuf,
    tree: Config,
}

impl LoadedConfig {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dotted lookup into the raw tree, e.g. `database.adapter`.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.tree.get_string(key).ok()
    }

    /// Typed view used by the generators.
    pub fn project_config(&self) -> DevtoolsResult<ProjectConfig> {
        self.tree
            .clone()
            .try_deserialize::<ProjectConfig>()
            .map_err(|e| {
                ApplicationError::ConfigurationInvalid {
                    path: self.path.clone(),
                    reason: e.to_string(),
                }
                .into()
            })
    }
}

/// Parse one config file, picking the format from its extension.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn load_file(path: &Path) -> DevtoolsResult<LoadedConfig> {
    let invalid = |reason: String| ApplicationError::ConfigurationInvalid {
        path: path.to_path_buf(),
        reason,
    };

    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(format_for)
        .ok_or_else(|| {
            invalid(format!(
                "unsupported extension; expected one of {}",
                CONFIG_EXTENSIONS.join(", ")
            ))
        })?;

    let text = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let tree = Config::builder()
        .add_source(config::File::from_str(&text, format))
        .build()
        .map_err(|e| invalid(e.to_string()))?;

    debug!("config parsed");
    Ok(LoadedConfig {
        path: path.to_path_buf(),
        tree,
    })
}

/// Finds the application config below a project root.
#[derive(Debug, Clone)]
pub struct ConfigScanner {
    base_path: PathBuf,
}

impl ConfigScanner {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Directories probed, in order; empty when the base path is not a
    /// readable directory.
    pub fn config_dirs(&self) -> Vec<PathBuf> {
        if fs::read_dir(&self.base_path).is_err() {
            return Vec::new();
        }
        CONFIG_DIRECTORIES
            .iter()
            .map(|dir| self.base_path.join(dir))
            .collect()
    }

    /// First readable `<name>.<ext>`, directory-major.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);

        for dir in self.config_dirs() {
            for ext in CONFIG_EXTENSIONS {
                let candidate = dir.join(format!("{stem}.{ext}"));
                trace!(path = %candidate.display(), "probing");
                if candidate.is_file() && fs::File::open(&candidate).is_ok() {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// `Ok(None)` when nothing matched; a match that fails to parse is an error.
    #[instrument(skip(self), fields(base = %self.base_path.display()))]
    pub fn scan(&self, name: &str) -> DevtoolsResult<Option<LoadedConfig>> {
        self.find(name).map(|path| load_file(&path)).transpose()
    }

    /// Like [`scan`](Self::scan) but a miss is
    /// [`ApplicationError::ConfigurationNotFound`] listing the probed directories.
    pub fn load(&self, name: &str) -> DevtoolsResult<LoadedConfig> {
        self.scan(name)?.ok_or_else(|| {
            ApplicationError::ConfigurationNotFound {
                scanned: self.config_dirs(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devtools_core::error::DevtoolsError;
    use tempfile::TempDir;

    const INI: &str = "[database]\nadapter = Postgresql\nhost = localhost\nport = 5433\ndbname = shop\n\n[application]\nmodelsDir = app/models/\nbaseUri = /shop/\n";

    fn project(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = temp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        temp
    }

    #[test]
    fn first_candidate_directory_wins() {
        let temp = project(&[
            ("app/config/config.ini", INI),
            ("config/config.json", r#"{"database": {"adapter": "Mysql"}}"#),
        ]);
        let loaded = ConfigScanner::new(temp.path()).load(CONFIG_NAME).unwrap();
        assert_eq!(loaded.path(), temp.path().join("config/config.json"));
        assert_eq!(loaded.get_string("database.adapter").as_deref(), Some("Mysql"));
    }

    #[test]
    fn ini_is_tried_before_json() {
        let temp = project(&[
            ("app/config/config.json", r#"{"database": {"adapter": "Mysql"}}"#),
            ("app/config/config.ini", INI),
        ]);
        let loaded = ConfigScanner::new(temp.path()).load("config.php").unwrap();
        assert_eq!(loaded.path(), temp.path().join("app/config/config.ini"));
    }

    #[test]
    fn ini_maps_onto_project_config() {
        let temp = project(&[("apps/frontend/config/config.ini", INI)]);
        let config = ConfigScanner::new(temp.path())
            .load(CONFIG_NAME)
            .unwrap()
            .project_config()
            .unwrap();

        assert_eq!(config.database.adapter, "Postgresql");
        assert_eq!(config.database.port, Some(5433));
        assert_eq!(config.database.dbname.as_deref(), Some("shop"));
        assert_eq!(config.application.models_dir.as_deref(), Some("app/models/"));
        assert_eq!(config.application.base_uri.as_deref(), Some("/shop/"));
    }

    #[test]
    fn yaml_and_toml_are_supported() {
        let temp = project(&[(
            "config/config.yml",
            "database:\n  adapter: Sqlite\n  dbname: db.sqlite\n",
        )]);
        let config = ConfigScanner::new(temp.path())
            .load(CONFIG_NAME)
            .unwrap()
            .project_config()
            .unwrap();
        assert_eq!(config.database.adapter, "Sqlite");

        let temp = project(&[(
            "app/backend/config/config.toml",
            "[application]\nmodels_dir = \"models\"\n",
        )]);
        let config = ConfigScanner::new(temp.path())
            .load(CONFIG_NAME)
            .unwrap()
            .project_config()
            .unwrap();
        assert_eq!(config.application.models_dir.as_deref(), Some("models"));
    }

    #[test]
    fn miss_lists_every_scanned_directory() {
        let temp = project(&[("README.md", "")]);
        let err = ConfigScanner::new(temp.path()).load(CONFIG_NAME).unwrap_err();

        match err {
            DevtoolsError::Application(ApplicationError::ConfigurationNotFound { scanned }) => {
                assert_eq!(scanned.len(), CONFIG_DIRECTORIES.len());
                assert_eq!(scanned[0], temp.path().join("config"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unreadable_base_scans_nothing() {
        let scanner = ConfigScanner::new("/definitely/not/here");
        assert!(scanner.config_dirs().is_empty());
        assert!(scanner.scan(CONFIG_NAME).unwrap().is_none());
    }

    #[test]
    fn broken_file_is_invalid_not_missing() {
        let temp = project(&[("config/config.json", "{ not json")]);
        let err = ConfigScanner::new(temp.path()).load(CONFIG_NAME).unwrap_err();
        assert!(matches!(
            err,
            DevtoolsError::Application(ApplicationError::ConfigurationInvalid { .. })
        ));
    }

    #[test]
    fn explicit_file_needs_a_known_extension() {
        let temp = project(&[("settings.conf", INI), ("db.ini", INI)]);
        assert!(load_file(&temp.path().join("settings.conf")).is_err());
        let loaded = load_file(&temp.path().join("db.ini")).unwrap();
        assert_eq!(loaded.get_string("database.dbname").as_deref(), Some("shop"));
    }
}
