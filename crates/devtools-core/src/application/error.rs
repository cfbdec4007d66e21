//! Application layer errors.
//!
//! These errors represent failures in orchestration and at the ports, not
//! rule violations. Rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No application config in any candidate directory.
    #[error("Configuration file couldn't be loaded! Scanned paths: {}", join_paths(.scanned))]
    ConfigurationNotFound { scanned: Vec<PathBuf> },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigurationInvalid { path: PathBuf, reason: String },

    #[error("Builder doesn't know where the models directory is")]
    ModelsDirUnknown,

    #[error("Could not connect to {adapter} database: {reason}")]
    ConnectionFailed { adapter: String, reason: String },

    #[error("Introspection of '{table}' failed: {reason}")]
    IntrospectionFailed { table: String, reason: String },

    #[error("Table '{table}' doesn't exist in schema '{schema}'")]
    TableNotFound { table: String, schema: String },

    /// No skeleton for the requested flavor.
    #[error("Template resolution failed: {reason}")]
    TemplateResolution { reason: String },

    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned).
    #[error("Template store error")]
    StoreLockError,

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

fn join_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "(base path not readable)".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigurationNotFound { .. } => vec![
                "Run the command from the project root or pass --directory".into(),
                "Expected config.{ini,json,toml,yml,yaml} under config/ or app/config/".into(),
                "Or point at a file explicitly with --config".into(),
            ],
            Self::ConfigurationInvalid { path, .. } => vec![
                format!("Fix the syntax of {}", path.display()),
            ],
            Self::ModelsDirUnknown => vec![
                "Set application.modelsDir in your config".into(),
                "Or pass --output <DIR>".into(),
            ],
            Self::ConnectionFailed { adapter, .. } => vec![
                format!("Check that the {} server is running and reachable", adapter),
                "Verify database.host, port, username, and password".into(),
            ],
            Self::TableNotFound { schema, .. } => vec![
                format!("List tables in schema '{}' and check the spelling", schema),
                "Use --schema to pick another schema".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::StoreLockError => vec![
                "The template store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different project name or --directory".into(),
            ],
            Self::TemplateResolution { .. } => vec![
                "Check --template-path points at a directory with project/<type>/".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationNotFound { .. }
            | Self::ConfigurationInvalid { .. }
            | Self::ModelsDirUnknown => ErrorCategory::Configuration,
            Self::ConnectionFailed { .. } => ErrorCategory::Configuration,
            Self::TableNotFound { .. } | Self::TemplateResolution { .. } => ErrorCategory::NotFound,
            Self::ValidationFailed(_) | Self::ProjectExists { .. } => ErrorCategory::Validation,
            Self::IntrospectionFailed { .. }
            | Self::RenderingFailed { .. }
            | Self::FilesystemError { .. }
            | Self::StoreLockError
            | Self::RollbackFailed { .. } => ErrorCategory::Internal,
        }
    }
}
