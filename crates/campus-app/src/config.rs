//! Configuration for the Campus client.
//!
//! Settings load from `campus.json` in the working directory. A missing
//! file means defaults; a present-but-invalid file is an error with a
//! suggestion attached, never a silent fallback.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "campus.json";

/// Default API base URL.
fn default_api_base_url() -> String {
    "http://localhost:4000".to_string()
}

/// Default notification-channel URL.
fn default_notify_url() -> String {
    "ws://localhost:4000/ws/notifications".to_string()
}

/// Default bearer-token file path.
fn default_token_file() -> String {
    ".campus/token.json".to_string()
}

/// Default request timeout in seconds.
const fn default_request_timeout() -> u64 {
    30
}

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the Campus HTTP API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// WebSocket URL of the notification channel.
    #[serde(default = "default_notify_url")]
    pub notify_url: String,

    /// Where the bearer token is persisted between invocations.
    #[serde(default = "default_token_file")]
    pub token_file: String,

    /// Per-request timeout in seconds. The only timeout contract the
    /// client has; nothing layers retries on top of it.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            notify_url: default_notify_url(),
            token_file: default_token_file(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `campus.json` exists but is invalid.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            AppError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `campus.json` exists in the directory but is
    /// invalid.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file yields the (validated) defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ConfigParse`] for unreadable or malformed files
    /// and [`AppError::ConfigValidation`] for invalid values.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(AppError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| AppError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ConfigValidation`] when any check fails.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(AppError::config_validation(
                "apiBaseUrl must not be empty",
                "Set apiBaseUrl to your Campus API origin in campus.json",
            ));
        }

        if self.notify_url.trim().is_empty() {
            return Err(AppError::config_validation(
                "notifyUrl must not be empty",
                "Set notifyUrl to the notification WebSocket URL in campus.json",
            ));
        }

        if self.token_file.trim().is_empty() {
            return Err(AppError::config_validation(
                "tokenFile must not be empty",
                "Set tokenFile to a writable path in campus.json",
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(AppError::config_validation(
                "requestTimeoutSecs must be greater than 0",
                "Set requestTimeoutSecs to at least 1 in campus.json",
            ));
        }

        Ok(())
    }
}
