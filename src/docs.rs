use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use foodhub_auth::Role;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, SessionResponse,
};
use crate::modules::users::model::{Address, CreateAddressDto, UpdateProfileDto, User};
use crate::utils::carrier::{ACCESS_COOKIE, REFRESH_COOKIE};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_session,
        crate::modules::auth::controller::logout_user,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::update_me,
        crate::modules::users::controller::add_address,
        crate::modules::users::controller::get_addresses,
    ),
    components(
        schemas(
            Role,
            User,
            Address,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            SessionResponse,
            UpdateProfileDto,
            CreateAddressDto,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, logout and session rotation"),
        (name = "Users", description = "Profile and delivery address endpoints")
    ),
    info(
        title = "FoodHub API",
        version = "0.1.0",
        description = "FoodHub gateway: cookie-based sessions with short-lived access tokens and rotating refresh tokens.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(ACCESS_COOKIE))),
            );
            components.add_security_scheme(
                "refresh_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(REFRESH_COOKIE))),
            );
        }
    }
}
