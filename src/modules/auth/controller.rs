use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use foodhub_core::AppError;

use crate::modules::auth::model::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, SessionResponse,
};
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::utils::carrier;
use crate::validator::ValidatedJson;

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Bad request - malformed body", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let user = AuthService::register_user(state.users.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id: user.id })))
}

/// Login and receive session cookies
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookies set", body = LoginResponse),
        (status = 400, description = "Bad request - malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let (user, pair) = AuthService::login_user(state.users.as_ref(), &state.issuer, dto).await?;

    let jar = carrier::store_pair(jar, &pair, &state.cookie_config);
    Ok((
        jar,
        Json(LoginResponse {
            user,
            access_expires_at: pair.access_expires_at,
        }),
    ))
}

/// Rotate the session using the refresh cookie
///
/// Any failure clears both cookies and returns 401.
#[utoipa::path(
    post,
    path = "/api/users/refresh",
    responses(
        (status = 200, description = "New session cookies set", body = SessionResponse),
        (status = 401, description = "Unauthorized - missing, expired or invalid refresh token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("refresh_cookie" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn refresh_session(State(state): State<AppState>, jar: CookieJar) -> Response {
    let presented = carrier::refresh_token(&jar);

    match AuthService::refresh_session(&state.issuer, presented) {
        Ok(rotation) => {
            let jar = carrier::store_pair(jar, &rotation.pair, &state.cookie_config);
            let body = SessionResponse {
                user_id: rotation.identity.sub,
                role: rotation.identity.role,
                access_expires_at: rotation.pair.access_expires_at,
            };
            (jar, Json(body)).into_response()
        }
        Err(err) => {
            let jar = carrier::clear(jar, &state.cookie_config);
            (jar, AppError::from(err)).into_response()
        }
    }
}

/// Logout and clear session cookies
#[utoipa::path(
    post,
    path = "/api/users/logout",
    responses(
        (status = 204, description = "Session cookies cleared")
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn logout_user(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        carrier::clear(jar, &state.cookie_config),
        StatusCode::NO_CONTENT,
    )
}
