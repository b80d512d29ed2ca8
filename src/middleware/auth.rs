use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use foodhub_auth::{AuthError, Identity, Role, TokenIssuer};
use foodhub_core::AppError;

use crate::metrics::track_session_rejected;
use crate::state::AppState;
use crate::utils::carrier;

/// Result of running the session gate over one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Authenticated(Identity),
    Rejected(Rejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No access cookie on the request.
    MissingCredential,
    /// Access cookie present but failed verification.
    InvalidCredential(AuthError),
}

impl Rejection {
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::MissingCredential => AuthError::MissingCredential.reason(),
            Rejection::InvalidCredential(err) => err.reason(),
        }
    }

    fn into_auth_error(self) -> AuthError {
        match self {
            Rejection::MissingCredential => AuthError::MissingCredential,
            Rejection::InvalidCredential(err) => err,
        }
    }
}

/// Decides whether the access cookie in `jar` authenticates the request.
pub fn evaluate(issuer: &TokenIssuer, jar: &CookieJar) -> GateOutcome {
    let Some(token) = carrier::access_token(jar) else {
        return GateOutcome::Rejected(Rejection::MissingCredential);
    };

    match issuer.authenticate(&token) {
        Ok(identity) => GateOutcome::Authenticated(identity),
        Err(err) => GateOutcome::Rejected(Rejection::InvalidCredential(err)),
    }
}

/// Session gate for protected routes.
///
/// Attach with `route_layer(middleware::from_fn_with_state(state, require_session))`.
/// On success the verified [`Identity`] is stored in the request extensions
/// for [`AuthUser`]. Every rejection produces the same 401 response and the
/// wrapped handler never runs.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match evaluate(&state.issuer, &jar) {
        GateOutcome::Authenticated(identity) => {
            tracing::debug!(subject = %identity.sub, role = %identity.role, "Session authenticated");
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        GateOutcome::Rejected(rejection) => {
            let reason = rejection.reason();
            tracing::info!(
                reason,
                method = %req.method(),
                path = %req.uri().path(),
                "Session rejected"
            );
            track_session_rejected(reason);
            AppError::from(rejection.into_auth_error()).into_response()
        }
    }
}

/// Verified caller identity, as set by [`require_session`].
///
/// Read-only: handlers get the subject, contact and role the token carried
/// and nothing from the request body.
#[derive(Debug, Clone)]
pub struct AuthUser(Identity);

impl AuthUser {
    pub fn identity(&self) -> &Identity {
        &self.0
    }

    pub fn subject(&self) -> &str {
        &self.0.sub
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    /// Get the user ID as UUID
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub).map_err(|_| {
            tracing::warn!(subject = %self.0.sub, "Token subject is not a UUID");
            AppError::unauthorized()
        })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::error!(path = %parts.uri.path(), "AuthUser used on a route without the session gate");
                AppError::unauthorized()
            })
    }
}
