//! Signing configuration for session tokens.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: HMAC signing secret (required, non-empty)
//! - `JWT_ACCESS_EXPIRY`: access token lifetime in seconds (default: 900, 15 minutes)
//! - `JWT_REFRESH_EXPIRY`: refresh token lifetime in seconds (default: 432000, 5 days)
//! - `JWT_ALGORITHM`: one of `HS256`, `HS384`, `HS512` (default: `HS256`)

use std::env;
use std::fmt;

use jsonwebtoken::Algorithm;

use crate::error::ConfigError;
use crate::parse_var;

pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 15 * 60;
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 5 * 24 * 60 * 60;
/// Upper bound for either lifetime (one year).
pub const MAX_TOKEN_EXPIRY: i64 = 365 * 24 * 60 * 60;

/// Process-wide signing configuration.
///
/// Loaded once at startup and handed to the credential signer. The secret is
/// never rotated while the process runs; restarting with a new secret
/// invalidates every token issued under the old one.
#[derive(Clone, PartialEq, Eq)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expiry: i64,
    pub algorithm: Algorithm,
}

impl JwtConfig {
    /// Builds a config with default lifetimes and algorithm.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry: DEFAULT_ACCESS_TOKEN_EXPIRY,
            refresh_token_expiry: DEFAULT_REFRESH_TOKEN_EXPIRY,
            algorithm: Algorithm::HS256,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    pub fn from_source<F>(source: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = source("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let algorithm = match source("JWT_ALGORITHM") {
            Some(raw) => parse_algorithm(&raw)?,
            None => Algorithm::HS256,
        };

        let config = Self {
            secret,
            access_token_expiry: parse_var(
                &source,
                "JWT_ACCESS_EXPIRY",
                DEFAULT_ACCESS_TOKEN_EXPIRY,
            )?,
            refresh_token_expiry: parse_var(
                &source,
                "JWT_REFRESH_EXPIRY",
                DEFAULT_REFRESH_TOKEN_EXPIRY,
            )?,
            algorithm,
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the signer and issuer rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.access_token_expiry <= 0 {
            return Err(ConfigError::NonPositiveLifetime("JWT_ACCESS_EXPIRY"));
        }
        if self.refresh_token_expiry <= 0 {
            return Err(ConfigError::NonPositiveLifetime("JWT_REFRESH_EXPIRY"));
        }
        for (key, value) in [
            ("JWT_ACCESS_EXPIRY", self.access_token_expiry),
            ("JWT_REFRESH_EXPIRY", self.refresh_token_expiry),
        ] {
            if value > MAX_TOKEN_EXPIRY {
                return Err(ConfigError::Invalid {
                    key,
                    value: value.to_string(),
                });
            }
        }
        if self.access_token_expiry >= self.refresh_token_expiry {
            return Err(ConfigError::LifetimeOrder {
                access: self.access_token_expiry,
                refresh: self.refresh_token_expiry,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        _ => Err(ConfigError::Invalid {
            key: "JWT_ALGORITHM",
            value: raw.to_string(),
        }),
    }
}
