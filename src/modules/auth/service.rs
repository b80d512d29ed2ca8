use std::sync::LazyLock;

use anyhow::anyhow;
use axum::http::StatusCode;
use tracing::instrument;

use foodhub_auth::{AuthError, Identity, Rotation, TokenIssuer, TokenPair, rotate};
use foodhub_core::{AppError, hash_password, verify_password};

use crate::metrics::{track_login, track_rotation, track_tokens_issued, track_user_registered};
use crate::modules::users::directory::UserDirectory;
use crate::modules::users::model::{NewUser, User};

use super::model::{LoginRequest, RegisterRequest};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn invalid_credentials() -> AppError {
    AppError::new(StatusCode::UNAUTHORIZED, anyhow!(INVALID_CREDENTIALS))
}

/// Hash checked against when the email is unknown, so both login failures
/// pay the same bcrypt cost.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("foodhub-unknown-account").ok());

fn burn_password_check(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(users))]
    pub async fn register_user(
        users: &dyn UserDirectory,
        dto: RegisterRequest,
    ) -> Result<User, AppError> {
        if users.email_exists(&dto.email).await? {
            return Err(AppError::conflict(anyhow!("Email already registered")));
        }

        let password_hash = hash_password(&dto.password)?;

        let user = users
            .create_user(NewUser {
                email: dto.email,
                password_hash,
                name: dto.name,
                phone: dto.phone,
                role: dto.role,
            })
            .await?;

        track_user_registered(user.role.as_str());
        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        Ok(user)
    }

    /// Checks the password and issues a fresh pair.
    ///
    /// Unknown email and wrong password produce the same 401.
    #[instrument(skip(users, issuer))]
    pub async fn login_user(
        users: &dyn UserDirectory,
        issuer: &TokenIssuer,
        dto: LoginRequest,
    ) -> Result<(User, TokenPair), AppError> {
        let Some(credentials) = users.find_credentials_by_email(&dto.email).await? else {
            burn_password_check(&dto.password);
            track_login("invalid_credentials");
            return Err(invalid_credentials());
        };

        if !verify_password(&dto.password, &credentials.password_hash)? {
            track_login("invalid_credentials");
            return Err(invalid_credentials());
        }

        let user = credentials.user;
        let identity = Identity::new(user.id.to_string(), user.email.clone(), user.role);
        let pair = issuer.issue_pair(&identity).inspect_err(|_| track_login("error"))?;

        track_login("success");
        track_tokens_issued("access");
        track_tokens_issued("refresh");
        tracing::info!(user_id = %user.id, "User logged in");

        Ok((user, pair))
    }

    /// Exchanges the presented refresh token for a new pair.
    #[instrument(skip_all)]
    pub fn refresh_session(
        issuer: &TokenIssuer,
        refresh_token: Option<String>,
    ) -> Result<Rotation, AuthError> {
        let result = refresh_token
            .ok_or(AuthError::MissingCredential)
            .and_then(|token| rotate(issuer, &token));

        match &result {
            Ok(rotation) => {
                track_rotation("success");
                track_tokens_issued("access");
                track_tokens_issued("refresh");
                tracing::info!(subject = %rotation.identity.sub, "Session rotated");
            }
            Err(err) if err.is_authorization_failure() => {
                track_rotation(err.reason());
                tracing::info!(reason = err.reason(), "Session rotation refused");
            }
            Err(err) => {
                track_rotation(err.reason());
                tracing::error!(error = %err, "Session rotation failed");
            }
        }

        result
    }
}
