use std::sync::Arc;

use anyhow::Context;

use foodhub_auth::TokenIssuer;
use foodhub_config::{CookieConfig, CorsConfig, JwtConfig};
use foodhub_db::{init_db_pool, run_migrations};

use crate::modules::users::directory::{PgUserDirectory, UserDirectory};

/// Shared per-process state handed to every handler.
///
/// The issuer is built once from [`JwtConfig`]; nothing else holds the
/// signing secret.
#[derive(Clone, Debug)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    pub users: Arc<dyn UserDirectory>,
    pub cookie_config: CookieConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(
        issuer: TokenIssuer,
        users: Arc<dyn UserDirectory>,
        cookie_config: CookieConfig,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            issuer: Arc::new(issuer),
            users,
            cookie_config,
            cors_config,
        }
    }
}

/// Loads configuration from the environment, connects to PostgreSQL and
/// applies migrations.
///
/// Fails before the server binds if `JWT_SECRET` is missing or the token
/// lifetimes are invalid.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env().context("Invalid JWT configuration")?;
    let cookie_config = CookieConfig::from_env().context("Invalid cookie configuration")?;
    let cors_config = CorsConfig::from_env();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db = init_db_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&db)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!(
        algorithm = ?jwt_config.algorithm,
        access_expiry_secs = jwt_config.access_token_expiry,
        refresh_expiry_secs = jwt_config.refresh_token_expiry,
        "Token issuer configured"
    );

    Ok(AppState::new(
        TokenIssuer::new(&jwt_config),
        Arc::new(PgUserDirectory::new(db)),
        cookie_config,
        cors_config,
    ))
}
