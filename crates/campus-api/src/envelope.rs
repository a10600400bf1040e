//! The JSON response envelope every Campus endpoint uses.
//!
//! Responses arrive as `{ "success": bool, "message": string?, "data": T? }`.
//! [`Envelope::into_result`] converts that shape into a typed `Result`, so a
//! `success: false` body becomes an [`ApiError::Rejected`] carrying the
//! server's message verbatim and callers are forced to handle both arms.

use serde::Deserialize;

use crate::error::{ApiError, Result};

/// Generic response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable message, present on rejections and some acks.
    #[serde(default)]
    pub message: Option<String>,
    /// Typed payload, present on success for data-bearing endpoints.
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Converts the envelope into the typed payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when `success` is false (message taken
    /// verbatim when present), or when a successful envelope is missing its
    /// payload.
    pub fn into_result(self) -> Result<T> {
        if !self.success {
            return Err(ApiError::rejected(
                self.message
                    .unwrap_or_else(|| "request rejected by the server".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::rejected("successful response carried no payload"))
    }

    /// Converts the envelope into a unit acknowledgment, ignoring any payload.
    ///
    /// Used by endpoints that only confirm an action (mark watched, retake,
    /// rate, delete).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when `success` is false.
    pub fn into_ack(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(ApiError::rejected(
                self.message
                    .unwrap_or_else(|| "request rejected by the server".to_string()),
            ))
        }
    }
}
