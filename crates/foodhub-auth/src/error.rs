//! Auth error taxonomy and its mapping onto HTTP responses.
//!
//! Every variant except [`AuthError::Signing`] is an authorization failure
//! and collapses into the same `401 {"error":"Unauthorized"}` response. The
//! variant survives only in logs and metrics via [`AuthError::reason`].

use foodhub_core::AppError;
use thiserror::Error;

use crate::claims::TokenKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Secret missing or claims incomplete. Server-side fault, never retried.
    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("token has expired")]
    Expired,

    /// Bad signature, malformed token or unexpected algorithm.
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("expected a {expected} token")]
    WrongTokenKind { expected: TokenKind },

    #[error("no credential presented")]
    MissingCredential,
}

impl AuthError {
    /// Stable label for logs and metrics. Never sent to clients.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::Signing(_) => "signing_error",
            AuthError::Expired => "expired",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::WrongTokenKind { .. } => "wrong_token_kind",
            AuthError::MissingCredential => "missing_credential",
        }
    }

    pub fn is_authorization_failure(&self) -> bool {
        !matches!(self, AuthError::Signing(_))
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Signing(detail) => {
                tracing::error!(reason = "signing_error", %detail, "Token signing failed");
                AppError::internal(AuthError::Signing(detail))
            }
            other => {
                tracing::debug!(reason = other.reason(), "Authorization failed");
                AppError::unauthorized()
            }
        }
    }
}
