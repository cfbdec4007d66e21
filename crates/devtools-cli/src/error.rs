//! CLI errors.
//!
//! Wraps [`DevtoolsError`] with the failures that only exist at the command
//! line (settings, prompts, the webtools listener) and maps every one of them
//! to an exit code:
//!
//! | Category      | Code |
//! |---------------|------|
//! | User error    |  2   |
//! | Not found     |  3   |
//! | Configuration |  4   |
//! | Internal      |  1   |

use std::error::Error as _;

use owo_colors::OwoColorize;
use thiserror::Error;

use devtools_core::error::{DevtoolsError, ErrorCategory as CoreCategory, ErrorInfo};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Tool settings could not be read or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Anything raised by `devtools-core` or the adapters.
    #[error("{0}")]
    Core(#[from] DevtoolsError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation cancelled")]
    Cancelled,

    /// Built without a cargo feature the command needs.
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },

    /// The webtools listener could not start.
    #[error("Webtools server failed on {addr}: {message}")]
    ServerError { addr: String, message: String },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],
            Self::ConfigError { .. } => vec![
                "Check the settings file reported by 'devtools config path'".into(),
                "Run 'devtools config init --force' to rewrite the defaults".into(),
            ],
            Self::Core(core) => core.suggestions(),
            Self::IoError { .. } => vec![
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::Cancelled => vec!["No changes were made".into()],
            Self::FeatureNotAvailable { feature } => vec![format!(
                "Reinstall with the feature enabled: cargo install devtools-cli --features {}",
                feature
            )],
            Self::ServerError { .. } => vec![
                "Check that the address is free, or pass another with --addr".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::Cancelled => ErrorCategory::UserError,
            Self::ConfigError { .. } | Self::FeatureNotAvailable { .. } => {
                ErrorCategory::Configuration
            }
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } | Self::ServerError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// The flat record used by `--output-format json`.
    pub fn info(&self) -> ErrorInfo {
        let info = match self {
            Self::Core(core) => ErrorInfo::from(core),
            other => ErrorInfo::new(other.to_string()),
        };
        info.with_code(i32::from(self.exit_code()))
    }

    pub fn format_json(&self) -> String {
        serde_json::to_string_pretty(&self.info())
            .map(|json| format!("{json}\n"))
            .unwrap_or_else(|_| format!("{{\"message\": \"{}\"}}\n", self))
    }

    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// [`format_colored`](Self::format_colored) without ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = format!("\nError: {}\n", self);

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

/// Attach a context message to an I/O failure at the call-site.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devtools_core::application::ApplicationError;
    use devtools_core::domain::DomainError;
    use std::io;

    fn unsupported_adapter() -> CliError {
        CliError::Core(DevtoolsError::from(DomainError::UnsupportedAdapter {
            name: "Oracle".into(),
        }))
    }

    #[test]
    fn unsupported_adapter_is_configuration() {
        let err = unsupported_adapter();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("Oracle"));
    }

    #[test]
    fn missing_application_config_is_configuration() {
        let err = CliError::Core(DevtoolsError::from(
            ApplicationError::ConfigurationNotFound { scanned: vec![] },
        ));
        assert_eq!(err.exit_code(), 4);
        assert!(err.suggestions().iter().any(|s| s.contains("--directory")));
    }

    #[test]
    fn table_not_found_is_not_found() {
        let err = CliError::Core(DevtoolsError::from(ApplicationError::TableNotFound {
            table: "ghosts".into(),
            schema: "blog".into(),
        }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn exit_codes_for_cli_variants() {
        assert_eq!(CliError::InvalidInput { message: "x".into() }.exit_code(), 2);
        assert_eq!(CliError::Cancelled.exit_code(), 2);
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn json_carries_exit_code() {
        let json = unsupported_adapter().format_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["code"], 4);
        assert!(value["message"].as_str().unwrap().contains("Oracle"));
    }

    #[test]
    fn format_plain_contains_error_header() {
        let s = unsupported_adapter().format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_omits_hint() {
        let s = CliError::Cancelled.format_plain(true);
        assert!(!s.contains("--verbose"));
    }

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading settings");
        assert!(matches!(cli, Err(CliError::IoError { .. })));
    }
}
