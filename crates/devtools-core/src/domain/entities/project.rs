use std::path::PathBuf;

use crate::domain::error::DomainError;
use crate::domain::value_objects::{Flavor, TemplateEngine};

/// Request to create a project skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    pub name: String,
    pub flavor: Flavor,
    /// Parent directory; the project is created at `directory/name`.
    pub directory: PathBuf,
    pub template_path: Option<PathBuf>,
    pub engine: TemplateEngine,
    pub enable_webtools: bool,
    pub use_config_ini: bool,
}

impl ProjectSpec {
    pub fn new(name: impl Into<String>, flavor: Flavor, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            flavor,
            directory: directory.into(),
            template_path: None,
            engine: TemplateEngine::default(),
            enable_webtools: false,
            use_config_ini: false,
        }
    }

    pub fn with_engine(mut self, engine: TemplateEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_webtools(mut self, enabled: bool) -> Self {
        self.enable_webtools = enabled;
        self
    }

    pub fn with_config_ini(mut self, enabled: bool) -> Self {
        self.use_config_ini = enabled;
        self
    }

    pub fn with_template_path(mut self, path: Option<PathBuf>) -> Self {
        self.template_path = path;
        self
    }

    /// Directory the skeleton is written into.
    pub fn root(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    /// `config.ini` or `config.php`.
    pub fn config_file(&self) -> &'static str {
        if self.use_config_ini {
            "config.ini"
        } else {
            "config.php"
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "project name",
            });
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(DomainError::InvalidProject(format!(
                "project name '{}' must be a single directory name",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_and_config_file() {
        let spec = ProjectSpec::new("store", Flavor::Simple, "/work").with_config_ini(true);
        assert_eq!(spec.root(), PathBuf::from("/work/store"));
        assert_eq!(spec.config_file(), "config.ini");
        assert_eq!(spec.with_config_ini(false).config_file(), "config.php");
    }

    #[test]
    fn rejects_path_like_names() {
        assert!(ProjectSpec::new("a/b", Flavor::Cli, ".").validate().is_err());
        assert!(ProjectSpec::new("..", Flavor::Cli, ".").validate().is_err());
        assert!(ProjectSpec::new("", Flavor::Cli, ".").validate().is_err());
        assert!(ProjectSpec::new("store", Flavor::Cli, ".").validate().is_ok());
    }
}
