//! Typed view over a project's application config.
//!
//! The adapters deserialize the scanned config tree (ini, json, toml, yaml)
//! into these structs. Keys are accepted in the framework's camelCase
//! (`modelsDir`) as well as snake_case (`models_dir`) and all-lowercase
//! spellings, since ini parsers fold case.

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::registry::{DefaultSchema, SchemaRule};
use crate::domain::value_objects::Adapter;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub application: ApplicationSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSettings {
    #[serde(default, alias = "modelsDir", alias = "modelsdir")]
    pub models_dir: Option<String>,
    #[serde(default, alias = "controllersDir", alias = "controllersdir")]
    pub controllers_dir: Option<String>,
    #[serde(default, alias = "migrationsDir", alias = "migrationsdir")]
    pub migrations_dir: Option<String>,
    #[serde(default, alias = "viewsDir", alias = "viewsdir")]
    pub views_dir: Option<String>,
    #[serde(default, alias = "baseUri", alias = "baseuri")]
    pub base_uri: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub adapter: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub dbname: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
}

impl DatabaseSettings {
    /// Parse `database.adapter`; unknown names are a configuration error.
    pub fn adapter(&self) -> Result<Adapter, DomainError> {
        if self.adapter.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "database.adapter",
            });
        }
        self.adapter.parse()
    }

    pub fn port_or_default(&self) -> Option<u16> {
        match self.port {
            Some(port) => Some(port),
            None => self.adapter().ok().and_then(|a| a.def().default_port),
        }
    }

    /// Schema tables are listed from: `--schema`, then `database.schema`,
    /// then the adapter default.
    pub fn resolve_schema(&self, explicit: Option<&str>) -> Result<String, DomainError> {
        let chosen = explicit
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| self.schema.as_deref().map(str::trim).filter(|s| !s.is_empty()));
        if let Some(schema) = chosen {
            return Ok(schema.to_string());
        }

        match self.adapter()?.def().default_schema {
            DefaultSchema::Fixed(schema) => Ok(schema.to_string()),
            DefaultSchema::DatabaseName => self.require_dbname(),
        }
    }

    /// Value a reference's schema must equal for relations to be inferred.
    pub fn comparison_schema(&self, schema: &str) -> Result<String, DomainError> {
        match self.adapter()?.def().reference_schema {
            SchemaRule::ConnectionSchema => Ok(schema.to_string()),
            SchemaRule::DatabaseName => self.require_dbname(),
        }
    }

    fn require_dbname(&self) -> Result<String, DomainError> {
        self.dbname
            .clone()
            .filter(|d| !d.trim().is_empty())
            .ok_or(DomainError::MissingRequiredField {
                field: "database.dbname",
            })
    }
}
