//! Identity claims embedded in every session token.
//!
//! - [`Identity`]: the subject/contact/role triple that trust decisions use
//! - [`Claims`]: the signed payload, i.e. an identity plus the token envelope
//! - [`Role`]: the closed set of account roles
//! - [`TokenKind`]: distinguishes access tokens from refresh tokens

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Account role. Closed set; unknown values fail to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Restaurant,
    Courier,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Customer, Role::Restaurant, Role::Courier];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Restaurant => "restaurant",
            Role::Courier => "courier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role: {0:?}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Verified identity of a caller.
///
/// Produced only by verifying a token; handlers read it but never build one
/// from request input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Subject: stable account identifier.
    pub sub: String,
    /// Contact email, for display and audit only.
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn new(sub: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            sub: sub.into(),
            email: email.into(),
            role,
        }
    }
}

/// Signed token payload.
///
/// # Fields
///
/// - `sub`, `email`, `role`: the [`Identity`]; identical across both tokens of a pair
/// - `kind`: access or refresh
/// - `jti`: random token id, unique per signature
/// - `iat`, `exp`: Unix seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub kind: TokenKind,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity {
            sub: self.sub.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}
