//! Middleware and extractors for request processing.
//!
//! - [`auth`]: the session gate and the [`auth::AuthUser`] extractor
//!
//! # Session Flow
//!
//! 1. Browser sends the `access_token` cookie with every request
//! 2. [`auth::require_session`] verifies it before the protected handler runs
//! 3. The verified identity is placed in request extensions
//! 4. Handlers read it back through [`auth::AuthUser`]
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! async fn get_profile(auth_user: AuthUser) -> Result<impl IntoResponse, AppError> {
//!     let user_id = auth_user.user_id()?;
//!     // ...
//! }
//! ```

pub mod auth;
