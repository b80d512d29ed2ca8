//! Access/refresh pair issuance.
//!
//! The issuer owns the two lifetimes and signs both halves of a pair from
//! one [`Identity`]. It keeps no record of what it issued.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use foodhub_config::JwtConfig;

use crate::claims::{Claims, Identity, TokenKind};
use crate::error::AuthError;
use crate::signer::CredentialSigner;

/// An access token and a refresh token issued together.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds.
    pub access_expires_at: i64,
    /// Unix seconds.
    pub refresh_expires_at: i64,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_expires_at", &self.access_expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct TokenIssuer {
    signer: CredentialSigner,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl TokenIssuer {
    /// Builds the signer and lifetimes from a validated [`JwtConfig`].
    pub fn new(config: &JwtConfig) -> Self {
        Self::from_parts(
            CredentialSigner::new(config),
            Duration::seconds(config.access_token_expiry),
            Duration::seconds(config.refresh_token_expiry),
        )
    }

    pub fn from_parts(
        signer: CredentialSigner,
        access_lifetime: Duration,
        refresh_lifetime: Duration,
    ) -> Self {
        Self {
            signer,
            access_lifetime,
            refresh_lifetime,
        }
    }

    pub fn signer(&self) -> &CredentialSigner {
        &self.signer
    }

    pub fn access_lifetime(&self) -> Duration {
        self.access_lifetime
    }

    pub fn refresh_lifetime(&self) -> Duration {
        self.refresh_lifetime
    }

    pub fn issue_pair(&self, identity: &Identity) -> Result<TokenPair, AuthError> {
        self.issue_pair_at(identity, Utc::now())
    }

    /// Signs an access token and a refresh token for `identity`, both
    /// issued at `now`. Fails as a whole if either signature fails.
    pub fn issue_pair_at(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthError> {
        let access = self
            .signer
            .sign_at(identity, TokenKind::Access, self.access_lifetime, now)?;
        let refresh = self
            .signer
            .sign_at(identity, TokenKind::Refresh, self.refresh_lifetime, now)?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            access_expires_at: access.claims.exp,
            refresh_expires_at: refresh.claims.exp,
        })
    }

    pub fn authenticate(&self, access_token: &str) -> Result<Identity, AuthError> {
        self.authenticate_at(access_token, Utc::now())
    }

    /// Verifies an access token and returns the identity it carries.
    /// Refresh tokens are refused.
    pub fn authenticate_at(
        &self,
        access_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError> {
        self.verify_kind_at(access_token, TokenKind::Access, now)
            .map(|claims| claims.identity())
    }

    pub(crate) fn verify_kind_at(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<Claims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        let claims = self.signer.verify_at(token, now)?;
        if claims.kind != expected {
            return Err(AuthError::WrongTokenKind { expected });
        }
        Ok(claims)
    }
}
