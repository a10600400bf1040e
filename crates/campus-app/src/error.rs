//! Error types for the application layer.

use std::path::PathBuf;

/// A specialized `Result` type for application-layer operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced by configuration loading, routing, and the stores.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid JSON syntax in the configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your campus.json with a JSON linter")]
    ConfigParse {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    /// A client-side form precondition failed; nothing was sent.
    #[error("{message}")]
    Validation {
        /// Message shown inline next to the field.
        message: String,
    },

    /// The screen requires signing in first.
    #[error("Sign in to open '{route}'\n\nSuggestion: Run 'campus login'")]
    SignInRequired {
        /// The route that was requested.
        route: String,
    },

    /// The signed-in role may not open this screen.
    #[error("The {role} role cannot open '{route}'")]
    AccessDenied {
        /// The route that was requested.
        route: String,
        /// The signed-in role.
        role: String,
    },

    /// No screen is mapped to the requested path.
    #[error("Nothing here: '{path}'")]
    RouteNotFound {
        /// The unmatched path.
        path: String,
    },

    /// An underlying API call failed.
    #[error(transparent)]
    Api(#[from] campus_api::ApiError),
}

impl AppError {
    /// Creates a `ConfigParse` error.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a `ConfigValidation` error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates an inline `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
