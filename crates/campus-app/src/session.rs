//! The session store: authenticated identity and the auth operations.
//!
//! Every other store gates its requests on this one - the bearer token the
//! session persists is what the API client attaches, and absence of a token
//! is a terminal error for any gated operation. The store itself is a plain
//! service object constructed once at startup and passed where needed.

use once_cell::sync::Lazy;
use regex::Regex;

use campus_api::types::{Credentials, RegisterRequest, Role, User};
use campus_api::{ApiClient, ApiError};

use crate::error::{AppError, Result};

/// Loose email shape check; the server remains the authority.
#[allow(clippy::unwrap_used)]
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Holds the signed-in identity, if any.
#[derive(Debug, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// Creates a signed-out session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The signed-in account, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The signed-in role, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Returns `true` while an identity is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Signs in: validates the form, exchanges credentials for a token,
    /// persists the token, and stores the identity.
    ///
    /// # Errors
    ///
    /// Returns an inline [`AppError::Validation`] before any request when
    /// the form is incomplete, or the API error on rejection.
    pub async fn login(&mut self, api: &ApiClient, credentials: &Credentials) -> Result<&User> {
        validate_email(&credentials.email)?;
        if credentials.password.is_empty() {
            return Err(AppError::validation("Enter your password"));
        }

        let auth = api.login(credentials).await?;
        api.tokens().save(auth.token.as_str())?;
        tracing::info!(user = %auth.user.email, role = %auth.user.role, "Signed in");

        Ok(&*self.user.insert(auth.user))
    }

    /// Signs out, clearing both the identity and the persisted token.
    ///
    /// # Errors
    ///
    /// Returns the token-store error if the file cannot be removed.
    pub fn logout(&mut self, api: &ApiClient) -> Result<()> {
        api.tokens().clear()?;
        self.user = None;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Registers a new student account.
    ///
    /// # Errors
    ///
    /// Returns an inline [`AppError::Validation`] before any request when
    /// the form is incomplete, or the API error on rejection.
    pub async fn register(&self, api: &ApiClient, request: &RegisterRequest) -> Result<()> {
        if request.name.trim().is_empty() {
            return Err(AppError::validation("Enter your name"));
        }
        validate_email(&request.email)?;
        if request.password.len() < 6 {
            return Err(AppError::validation(
                "Passwords need at least 6 characters",
            ));
        }

        api.register(request).await?;
        Ok(())
    }

    /// Confirms an email-verification code.
    pub async fn verify(&self, api: &ApiClient, code: &str) -> Result<()> {
        if code.trim().is_empty() {
            return Err(AppError::validation("Enter the verification code"));
        }
        api.verify(code).await?;
        Ok(())
    }

    /// Restores the identity behind a previously persisted token.
    ///
    /// Returns `false` (without error) when no token is stored; a stale or
    /// rejected token clears the store and also reports `false`.
    ///
    /// # Errors
    ///
    /// Passes through transport errors, which leave the token in place for
    /// a later retry.
    pub async fn restore(&mut self, api: &ApiClient) -> Result<bool> {
        match api.current_user().await {
            Ok(user) => {
                self.user = Some(user);
                Ok(true)
            }
            Err(ApiError::MissingAuth) => Ok(false),
            Err(e) if e.is_auth() => {
                tracing::debug!(error = %e, "Stored token rejected; clearing");
                api.tokens().clear()?;
                self.user = None;
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Validates an email's shape inline, before any request.
fn validate_email(email: &str) -> Result<()> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AppError::validation("Enter a valid email address"))
    }
}
