//! Error taxonomy for the auth engine.
//!
//! Every failure here is synchronous, caught at the calling form handler, and
//! surfaced inline to the user. None is retried automatically and none is
//! fatal to the process.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crewgate_core::Email;

/// Result type used across the auth engine.
pub type AuthResult<T> = Result<T, AuthError>;

/// Structured redirect target carried by flow errors.
///
/// The redirect is data, not a delimiter-encoded message string: callers must
/// never parse an error's display text for control flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectTarget {
    pub path: String,
    pub email: Option<Email>,
}

impl RedirectTarget {
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            email: None,
        }
    }

    pub fn with_email(path: impl Into<String>, email: Email) -> Self {
        Self {
            path: path.into(),
            email: Some(email),
        }
    }
}

/// Auth engine error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("account is deactivated")]
    AccountDeactivated,

    /// Login attempted on an unverified account. Carries the verification
    /// flow the caller should send the user to.
    #[error("account is not verified")]
    AccountUnverified { redirect: RedirectTarget },

    /// Login attempted on a portal that does not match the account's role.
    #[error("account does not belong to this portal")]
    WrongPortal,

    #[error("no account exists for this email")]
    NoSuchAccount,

    #[error("account is already verified")]
    AlreadyVerified,

    /// No pending code for this email, or the pending code belongs to a
    /// different flow.
    #[error("no one-time code is pending")]
    OtpNotFound,

    #[error("incorrect one-time code")]
    OtpInvalid,

    #[error("one-time code has expired")]
    OtpExpired,

    #[error("permission denied")]
    PermissionDenied,

    #[error("not authorized for this route")]
    RouteUnauthorized,
}
