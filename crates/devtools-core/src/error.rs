//! Unified error handling for devtools core.
//!
//! Wraps domain and application errors with a display category and
//! user-actionable suggestions, and defines [`ErrorInfo`], the flat record
//! used when an error is shown as JSON or on the webtools error page.

use serde::Serialize;
use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for devtools core operations.
#[derive(Debug, Error, Clone)]
pub enum DevtoolsError {
    /// Errors from the domain layer (rule violations).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration and I/O failures).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl DevtoolsError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your application config and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in devtools".into(),
                "Re-run with -vvv and include the log when reporting it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type DevtoolsResult<T> = Result<T, DevtoolsError>;

/// Extension trait for adding context to foreign errors.
pub trait Context<T> {
    fn context(self, msg: impl Into<String>) -> DevtoolsResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> DevtoolsResult<T> {
        self.map_err(|e| DevtoolsError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

// ============================================================================
// ErrorInfo
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    #[default]
    Exception,
    Error,
}

/// Immutable error record with named fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    code: i32,
    message: String,
    file: String,
    line: Option<u32>,
    kind: ErrorKind,
}

impl Default for ErrorInfo {
    fn default() -> Self {
        Self {
            code: -1,
            message: "No error message".to_string(),
            file: String::new(),
            line: None,
            kind: ErrorKind::Exception,
        }
    }
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.code = code;
        self
    }

    pub fn with_location(mut self, file: impl Into<String>, line: Option<u32>) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }

    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_exception(&self) -> bool {
        self.kind == ErrorKind::Exception
    }
}

impl From<&DevtoolsError> for ErrorInfo {
    fn from(err: &DevtoolsError) -> Self {
        ErrorInfo::new(err.to_string()).with_kind(ErrorKind::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_info_defaults() {
        let info = ErrorInfo::default();
        assert_eq!(info.code(), -1);
        assert_eq!(info.message(), "No error message");
        assert_eq!(info.file(), "");
        assert_eq!(info.line(), None);
        assert!(info.is_exception());
    }

    #[test]
    fn error_info_serializes_named_fields() {
        let info = ErrorInfo::new("Page not found").with_code(404);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["code"], 404);
        assert_eq!(json["message"], "Page not found");
        assert_eq!(json["kind"], "exception");
    }

    #[test]
    fn unsupported_adapter_maps_to_configuration() {
        let err = DevtoolsError::from(DomainError::UnsupportedAdapter { name: "Oracle".into() });
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.to_string().contains("Oracle"));
        assert!(err.suggestions().iter().any(|s| s.contains("Mysql")));
    }
}
