//! Persistent bearer-token storage.
//!
//! The token issued at login is kept as a small JSON file so the CLI stays
//! signed in across invocations. Absence of the file simply means "not
//! signed in"; token-bearing operations turn that into
//! [`ApiError::MissingAuth`] before any request leaves the process.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// On-disk shape of the stored token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// File-backed bearer-token store.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by the given file path. The file is not
    /// touched until the first `save`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored token, if any.
    ///
    /// A missing file is not an error; a present-but-corrupted file is.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Io`] on read failures other than not-found, or
    /// [`ApiError::Decode`] when the file contents are not valid JSON.
    pub fn load(&self) -> Result<Option<String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ApiError::Io(e)),
        };

        let stored: StoredToken = serde_json::from_str(&contents)?;
        Ok(Some(stored.token))
    }

    /// Loads the stored token, treating absence as a terminal error for the
    /// calling operation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingAuth`] when no token is stored.
    pub fn require(&self) -> Result<String> {
        self.load()?.ok_or(ApiError::MissingAuth)
    }

    /// Persists a freshly issued token, stamping the save time.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Io`] when the file or its parent directory cannot
    /// be written.
    pub fn save(&self, token: impl Into<String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let stored = StoredToken {
            token: token.into(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), "Token saved");
        Ok(())
    }

    /// Removes the stored token. Removing an already-absent token is fine.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Io`] on removal failures other than not-found.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Io(e)),
        }
    }
}
