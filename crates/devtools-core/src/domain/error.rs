// ============================================================================
// domain/error.rs - DOMAIN RULE VIOLATIONS
// ============================================================================

use thiserror::Error;

use crate::domain::registry::supported_adapter_names;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (services re-wrap them freely)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid {kind}: '{value}'")]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("Invalid project: {0}")]
    InvalidProject(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Template for flavor '{flavor}' has no content")]
    EmptyTemplate { flavor: String },

    #[error("Duplicate path in template: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Unknown project type '{0}'")]
    UnknownFlavor(String),

    #[error("Unknown template engine '{0}'")]
    UnknownTemplateEngine(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Adapter '{name}' is not supported")]
    UnsupportedAdapter { name: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnsupportedAdapter { name } => vec![
                format!("'{}' is not a known database adapter", name),
                format!("Supported adapters: {}", supported_adapter_names().join(", ")),
                "Set database.adapter in your application config".into(),
            ],
            Self::UnknownFlavor(_) => {
                vec!["Valid project types: cli, micro, simple, modules".into()]
            }
            Self::UnknownTemplateEngine(_) => vec!["Valid template engines: phtml, volt".into()],
            Self::InvalidIdentifier { kind, .. } => vec![
                format!("A {} must start with a letter or underscore", kind),
                "Only letters, digits, and underscores are allowed".into(),
            ],
            Self::MissingRequiredField { field } => {
                vec![format!("Provide a value for '{}'", field)]
            }
            Self::EmptyTemplate { flavor } => vec![
                format!("The '{}' skeleton has no files", flavor),
                "Check --template-path or use the built-in skeleton".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedAdapter { .. } | Self::MissingRequiredField { .. } => {
                ErrorCategory::Configuration
            }
            Self::InvalidIdentifier { .. }
            | Self::InvalidProject(_)
            | Self::UnknownFlavor(_)
            | Self::UnknownTemplateEngine(_) => ErrorCategory::Validation,
            Self::InvalidTemplate(_)
            | Self::EmptyTemplate { .. }
            | Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. } => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    NotFound,
    Internal,
}
