use thiserror::Error;

/// Errors raised while loading configuration at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{0} must be a positive number of seconds")]
    NonPositiveLifetime(&'static str),

    #[error(
        "access token lifetime ({access}s) must be shorter than refresh token lifetime ({refresh}s)"
    )]
    LifetimeOrder { access: i64, refresh: i64 },
}
