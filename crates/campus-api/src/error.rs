//! Error types for Campus API operations.
//!
//! The taxonomy mirrors how failures surface in the client: missing
//! authentication aborts an operation before any request is sent, transport
//! and server rejections leave screen state at its last-known-good value,
//! and nothing here is fatal to the application as a whole.

/// A specialized `Result` type for Campus API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors produced by the API client and token store.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No bearer token is present; the operation was aborted before any
    /// request was issued. There is no anonymous mode.
    #[error("Not signed in: no bearer token found\n\nSuggestion: Run 'campus login' to authenticate")]
    MissingAuth,

    /// The request failed at the transport layer (connection, TLS, body
    /// decode inside reqwest).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a `success: false` envelope; the message is
    /// shown to the user verbatim.
    #[error("{message}")]
    Rejected {
        /// Server-provided message.
        message: String,
    },

    /// The server answered with a non-success status and no parseable
    /// envelope.
    #[error("Unexpected server response (HTTP {status})")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
    },

    /// A successful response carried a body the client could not decode.
    #[error("Malformed response payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Token-store file I/O failed.
    #[error("Token store error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Creates a `Rejected` error from a server message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates an `UnexpectedStatus` error.
    #[must_use]
    pub const fn unexpected_status(status: u16) -> Self {
        Self::UnexpectedStatus { status }
    }

    /// Returns `true` if the failure is an authentication problem the user
    /// resolves by signing in again.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::MissingAuth | Self::UnexpectedStatus { status: 401 | 403 }
        )
    }

    /// Returns `true` if retrying the same operation may succeed.
    ///
    /// Retries are always user-initiated; the client never retries on its
    /// own.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::UnexpectedStatus { status: 500..=599 }
        )
    }
}
