use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use foodhub_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::model::{Address, CreateAddressDto, UpdateProfileDto, User};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get the profile of the signed-in user
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "User profile", body = User),
        (status = 401, description = "Unauthorized - missing or invalid session", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse),
    ),
    security(
        ("cookie_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all, fields(subject = %auth_user.subject()))]
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_profile(state.users.as_ref(), auth_user.user_id()?).await?;
    Ok(Json(user))
}

/// Update name and/or phone of the signed-in user
#[utoipa::path(
    patch,
    path = "/api/users/me",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid session", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
    ),
    security(
        ("cookie_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all, fields(subject = %auth_user.subject()))]
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<User>, AppError> {
    let user =
        UserService::update_profile(state.users.as_ref(), auth_user.user_id()?, dto).await?;
    Ok(Json(user))
}

/// Add a delivery address for the signed-in user
#[utoipa::path(
    post,
    path = "/api/users/addresses",
    request_body = CreateAddressDto,
    responses(
        (status = 201, description = "Address created", body = Address),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid session", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
    ),
    security(
        ("cookie_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all, fields(subject = %auth_user.subject()))]
pub async fn add_address(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateAddressDto>,
) -> Result<(StatusCode, Json<Address>), AppError> {
    let address = UserService::add_address(state.users.as_ref(), auth_user.user_id()?, dto).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// List delivery addresses of the signed-in user
#[utoipa::path(
    get,
    path = "/api/users/addresses",
    responses(
        (status = 200, description = "Addresses, newest first", body = Vec<Address>),
        (status = 401, description = "Unauthorized - missing or invalid session", body = ErrorResponse),
    ),
    security(
        ("cookie_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all, fields(subject = %auth_user.subject()))]
pub async fn get_addresses(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Address>>, AppError> {
    let addresses =
        UserService::list_addresses(state.users.as_ref(), auth_user.user_id()?).await?;
    Ok(Json(addresses))
}
