//! # FoodHub Config
//!
//! Configuration types for the FoodHub gateway, loaded from environment variables.
//!
//! - [`jwt`]: signing secret, algorithm and token lifetimes
//! - [`cookie`]: attributes of the session cookies
//! - [`cors`]: allowed browser origins
//! - [`server`]: listen address
//!
//! Every loader has a `from_env` constructor and a `from_source` constructor
//! taking a lookup closure, so tests can feed values without touching the
//! process environment.
//!
//! # Example
//!
//! ```ignore
//! use foodhub_config::{CookieConfig, CorsConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let cookie_config = CookieConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env()?;
//! ```

pub mod cookie;
pub mod cors;
pub mod error;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cookie::{CookieConfig, SameSitePolicy};
pub use cors::CorsConfig;
pub use error::ConfigError;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

pub(crate) fn parse_var<T, F>(source: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match source(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}
