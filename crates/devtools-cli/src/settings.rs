//! Tool settings.
//!
//! [`AppSettings`] is loaded once at startup and passed down by value.  The
//! CLI layer owns settings; the core crate never sees them. They are the
//! defaults of the tool itself, not the scanned application config of the
//! project being worked on.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `DEVTOOLS_<SECTION>__<KEY>`, e.g.
//!    `DEVTOOLS_PROJECT__FLAVOR=micro`
//! 3. Settings file (`--settings`, else the per-user config directory)
//! 4. Built-in defaults (always present)

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use devtools_core::domain::{Flavor, TemplateEngine};

const ENV_PREFIX: &str = "DEVTOOLS";

/// Tool settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Defaults for `project`.
    pub project: ProjectDefaults,
    /// Defaults for `model` and `all-models`.
    pub model: ModelDefaults,
    pub output: OutputSettings,
    pub webtools: WebtoolsSettings,
    /// File the settings were read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDefaults {
    pub flavor: Flavor,
    pub template_engine: TemplateEngine,
    pub enable_webtools: bool,
    pub use_config_ini: bool,
    pub template_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDefaults {
    pub namespace: Option<String>,
    pub extends: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub no_color: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebtoolsSettings {
    pub addr: String,
}

impl Default for WebtoolsSettings {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".into(),
        }
    }
}

impl AppSettings {
    /// Load settings from defaults, the settings file and the process
    /// environment.
    ///
    /// An explicit `settings_file` must exist; the default location is
    /// optional.
    pub fn load(settings_file: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_env(settings_file, None)
    }

    /// Like [`load`](Self::load) with the environment replaced by `env`
    /// when given.
    pub fn load_with_env(
        settings_file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode default settings")?;

        let (path, required) = match settings_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::settings_path(), false),
        };

        let tree = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_path()).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .with_context(|| format!("Failed to read settings from '{}'", path.display()))?;

        let mut settings: Self = tree
            .try_deserialize()
            .with_context(|| format!("Invalid settings in '{}'", path.display()))?;
        if path.is_file() {
            settings.source = Some(path);
        }
        debug!(source = ?settings.source, "Settings loaded");
        Ok(settings)
    }

    /// Path to the per-user settings file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.devtools.toml` in the current directory.
    pub fn settings_path() -> PathBuf {
        directories::ProjectDirs::from("com", "phalcon", "devtools")
            .map(|d| d.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from(".devtools.toml"))
    }

    /// Dotted lookup, e.g. `project.flavor`. Sections print as JSON.
    pub fn get(&self, key: &str) -> Option<String> {
        let tree = serde_json::to_value(self).ok()?;
        let value = key
            .split('.')
            .try_fold(&tree, |node, part| node.get(part))?;
        Some(match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_without_file_or_env() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent.toml");
        assert!(AppSettings::load_with_env(Some(&missing), env(&[])).is_err());

        let settings = AppSettings::load_with_env(None, env(&[])).unwrap();
        assert_eq!(settings.project.flavor, Flavor::Simple);
        assert_eq!(settings.webtools.addr, "127.0.0.1:8000");
    }

    #[test]
    fn file_then_environment() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        std::fs::write(
            &path,
            "[project]\nflavor = \"micro\"\ntemplate_engine = \"volt\"\n\n[model]\nnamespace = \"App\\\\Models\"\n",
        )
        .unwrap();

        let settings = AppSettings::load_with_env(
            Some(&path),
            env(&[("DEVTOOLS_PROJECT__FLAVOR", "cli"), ("DEVTOOLS_OUTPUT__NO_COLOR", "true")]),
        )
        .unwrap();

        assert_eq!(settings.project.flavor, Flavor::Cli);
        assert_eq!(settings.project.template_engine, TemplateEngine::Volt);
        assert_eq!(settings.model.namespace.as_deref(), Some("App\\Models"));
        assert!(settings.output.no_color);
        assert_eq!(settings.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn dotted_get() {
        let settings = AppSettings::default();
        assert_eq!(settings.get("project.flavor").as_deref(), Some("simple"));
        assert_eq!(settings.get("project.use_config_ini").as_deref(), Some("false"));
        assert_eq!(settings.get("model.namespace").as_deref(), Some(""));
        assert!(settings.get("project.nope").is_none());
    }

    #[test]
    fn settings_path_is_not_empty() {
        assert!(!AppSettings::settings_path().as_os_str().is_empty());
    }
}
