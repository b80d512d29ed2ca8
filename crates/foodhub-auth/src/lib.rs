//! # FoodHub Auth
//!
//! Stateless session tokens for the FoodHub gateway.
//!
//! - [`claims`]: identity payload and token envelope
//! - [`signer`]: HMAC signing and verification with a pinned algorithm
//! - [`issuer`]: access/refresh pair issuance
//! - [`rotation`]: refresh-token exchange
//! - [`error`]: the auth error taxonomy and its single HTTP mapping
//!
//! # Token Types
//!
//! Both tokens of a pair carry the same [`Identity`]; they differ in
//! lifetime, [`TokenKind`] and a random `jti`.
//!
//! - **Access Token**: short-lived, accepted by the session gate only
//! - **Refresh Token**: long-lived, accepted by rotation only
//!
//! Nothing is stored server-side. A token stays valid until its `exp`
//! unless the signing secret changes.
//!
//! # Example
//!
//! ```ignore
//! use foodhub_auth::{Identity, Role, TokenIssuer, rotate};
//! use foodhub_config::JwtConfig;
//!
//! let issuer = TokenIssuer::new(&JwtConfig::from_env()?);
//! let identity = Identity::new(user_id.to_string(), "ada@example.com", Role::Customer);
//!
//! let pair = issuer.issue_pair(&identity)?;
//! let verified = issuer.authenticate(&pair.access_token)?;
//! let rotated = rotate(&issuer, &pair.refresh_token)?;
//! ```

pub mod claims;
pub mod error;
pub mod issuer;
pub mod rotation;
pub mod signer;

// Re-export commonly used types at crate root
pub use claims::{Claims, Identity, ParseRoleError, Role, TokenKind};
pub use error::AuthError;
pub use issuer::{TokenIssuer, TokenPair};
pub use rotation::{Rotation, rotate, rotate_at};
pub use signer::{CredentialSigner, SignedToken};
