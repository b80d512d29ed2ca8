//! Attributes of the cookies that carry session tokens.
//!
//! # Environment Variables
//!
//! - `COOKIE_SECURE`: set the `Secure` attribute (default: `true`)
//! - `COOKIE_SAME_SITE`: `strict` or `lax` (default: `strict`)
//! - `COOKIE_DOMAIN`: optional `Domain` attribute

use std::env;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::parse_var;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SameSitePolicy {
    #[default]
    Strict,
    Lax,
}

impl FromStr for SameSitePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lax" => Ok(Self::Lax),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieConfig {
    pub secure: bool,
    pub same_site: SameSitePolicy,
    pub domain: Option<String>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: true,
            same_site: SameSitePolicy::Strict,
            domain: None,
        }
    }
}

impl CookieConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    pub fn from_source<F>(source: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            secure: parse_var(&source, "COOKIE_SECURE", true)?,
            same_site: parse_var(&source, "COOKIE_SAME_SITE", SameSitePolicy::Strict)?,
            domain: source("COOKIE_DOMAIN")
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        })
    }
}
