//! Cookie carrier for session tokens.
//!
//! Tokens travel between browser and gateway only as two `HttpOnly`
//! cookies:
//!
//! | Cookie | Path | Lifetime |
//! |--------|------|----------|
//! | `access_token` | `/` | access token lifetime |
//! | `refresh_token` | `/api/users/refresh` | refresh token lifetime |
//!
//! The refresh cookie is scoped to the rotation route, so the browser never
//! sends it anywhere else. Clearing writes both cookies back empty with
//! `Max-Age=0` on the same paths.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;

use foodhub_auth::TokenPair;
use foodhub_config::{CookieConfig, SameSitePolicy};

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

pub const ACCESS_COOKIE_PATH: &str = "/";
pub const REFRESH_COOKIE_PATH: &str = "/api/users/refresh";

/// Access token presented by the client, if any. Empty values count as absent.
pub fn access_token(jar: &CookieJar) -> Option<String> {
    non_empty(jar, ACCESS_COOKIE)
}

/// Refresh token presented by the client, if any. Empty values count as absent.
pub fn refresh_token(jar: &CookieJar) -> Option<String> {
    non_empty(jar, REFRESH_COOKIE)
}

/// Writes both halves of `pair` into the jar.
pub fn store_pair(jar: CookieJar, pair: &TokenPair, config: &CookieConfig) -> CookieJar {
    let now = Utc::now().timestamp();

    jar.add(session_cookie(
        ACCESS_COOKIE,
        pair.access_token.clone(),
        ACCESS_COOKIE_PATH,
        (pair.access_expires_at - now).max(0),
        config,
    ))
    .add(session_cookie(
        REFRESH_COOKIE,
        pair.refresh_token.clone(),
        REFRESH_COOKIE_PATH,
        (pair.refresh_expires_at - now).max(0),
        config,
    ))
}

/// Expires both cookies immediately.
pub fn clear(jar: CookieJar, config: &CookieConfig) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_COOKIE,
        String::new(),
        ACCESS_COOKIE_PATH,
        0,
        config,
    ))
    .add(session_cookie(
        REFRESH_COOKIE,
        String::new(),
        REFRESH_COOKIE_PATH,
        0,
        config,
    ))
}

fn non_empty(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|cookie| cookie.value().trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn session_cookie(
    name: &'static str,
    value: String,
    path: &'static str,
    max_age_secs: i64,
    config: &CookieConfig,
) -> Cookie<'static> {
    let mut builder = Cookie::build((name, value))
        .path(path)
        .http_only(true)
        .secure(config.secure)
        .same_site(match config.same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
        })
        .max_age(time::Duration::seconds(max_age_secs));

    if let Some(domain) = &config.domain {
        builder = builder.domain(domain.clone());
    }

    builder.build()
}
