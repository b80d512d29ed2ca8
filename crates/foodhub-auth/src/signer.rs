//! HMAC token signing and verification.
//!
//! The signer holds the process-wide secret and the single algorithm it
//! accepts. Verification rejects any token whose header names another
//! algorithm, including `none`, and treats `exp <= now` as expired with no
//! leeway.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use foodhub_config::JwtConfig;

use crate::claims::{Claims, Identity, TokenKind};
use crate::error::AuthError;

/// A freshly signed token together with the claims it carries.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedToken {
    pub token: String,
    pub claims: Claims,
}

impl fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedToken")
            .field("token", &"<redacted>")
            .field("claims", &self.claims)
            .finish()
    }
}

#[derive(Clone)]
pub struct CredentialSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    has_secret: bool,
}

impl CredentialSigner {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: config.algorithm,
            has_secret: !config.secret.trim().is_empty(),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn sign(
        &self,
        identity: &Identity,
        kind: TokenKind,
        lifetime: Duration,
    ) -> Result<SignedToken, AuthError> {
        self.sign_at(identity, kind, lifetime, Utc::now())
    }

    /// Signs `identity` as a `kind` token valid from `now` for `lifetime`.
    ///
    /// # Errors
    ///
    /// [`AuthError::Signing`] when the secret is empty, the subject is empty,
    /// the lifetime is not positive, or encoding fails.
    pub fn sign_at(
        &self,
        identity: &Identity,
        kind: TokenKind,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Result<SignedToken, AuthError> {
        if !self.has_secret {
            return Err(AuthError::Signing("signing secret is not configured".into()));
        }
        if identity.sub.trim().is_empty() {
            return Err(AuthError::Signing("claims are missing a subject".into()));
        }
        if lifetime <= Duration::zero() {
            return Err(AuthError::Signing("token lifetime must be positive".into()));
        }

        let iat = now.timestamp();
        let exp = iat
            .checked_add(lifetime.num_seconds())
            .ok_or_else(|| AuthError::Signing("token expiry overflows".into()))?;
        let claims = Claims {
            sub: identity.sub.clone(),
            email: identity.email.clone(),
            role: identity.role,
            kind,
            jti: Uuid::new_v4().to_string(),
            iat,
            exp,
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(format!("failed to encode token: {e}")))?;

        Ok(SignedToken { token, claims })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies signature, algorithm and expiry as of `now`.
    ///
    /// The signature is checked before expiry, so a forged token reports
    /// [`AuthError::InvalidSignature`] even when its `exp` has passed.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        if !self.has_secret {
            return Err(AuthError::Signing("signing secret is not configured".into()));
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidSignature,
            })?;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is compared against the caller's clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl fmt::Debug for CredentialSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSigner")
            .field("algorithm", &self.algorithm)
            .field("has_secret", &self.has_secret)
            .finish_non_exhaustive()
    }
}
