#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use axum_extra::extract::cookie::Cookie;
use foodhub::foodhub_auth::TokenIssuer;
use foodhub::foodhub_config::{CookieConfig, CorsConfig, JwtConfig};
use foodhub::modules::users::directory::InMemoryUserDirectory;
use foodhub::router::init_router;
use foodhub::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-characters-long";
pub const TEST_PASSWORD: &str = "testpass123";

pub fn test_state() -> AppState {
    AppState::new(
        TokenIssuer::new(&JwtConfig::new(TEST_SECRET)),
        Arc::new(InMemoryUserDirectory::new()),
        CookieConfig {
            secure: false,
            ..CookieConfig::default()
        },
        CorsConfig::from_source(|_| None),
    )
}

pub fn setup_test_app(state: AppState) -> Router {
    init_router(state, None)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4())
}

pub fn json_request(method: &str, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

/// All `Set-Cookie` headers on the response, parsed.
pub fn set_cookies(response: &Response<Body>) -> Vec<Cookie<'static>> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| Cookie::parse(v.to_str().unwrap().to_string()).unwrap())
        .collect()
}

pub fn find_cookie(cookies: &[Cookie<'static>], name: &str) -> Option<Cookie<'static>> {
    cookies.iter().find(|c| c.name() == name).cloned()
}

/// Asserts `name` was expired by the response: empty value and `Max-Age=0`.
pub fn assert_cleared(cookies: &[Cookie<'static>], name: &str) {
    let cookie = find_cookie(cookies, name).unwrap_or_else(|| panic!("{name} was not cleared"));
    assert_eq!(cookie.value(), "", "{name} still carries a value");
    assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
}

pub struct Session {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl Session {
    pub fn access_cookie(&self) -> String {
        format!("access_token={}", self.access_token)
    }

    pub fn refresh_cookie(&self) -> String {
        format!("refresh_token={}", self.refresh_token)
    }
}

pub async fn register_user(app: &Router, email: &str, role: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/register",
            json!({
                "email": email,
                "password": TEST_PASSWORD,
                "name": "Test User",
                "phone": "5550100",
                "role": role
            }),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["user_id"]
        .as_str()
        .unwrap()
        .to_string()
}

pub async fn login(app: &Router, email: &str) -> Session {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            json!({ "email": email, "password": TEST_PASSWORD }),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    let body = body_json(response).await;

    Session {
        user_id: body["user"]["id"].as_str().unwrap().to_string(),
        access_token: find_cookie(&cookies, "access_token")
            .unwrap()
            .value()
            .to_string(),
        refresh_token: find_cookie(&cookies, "refresh_token")
            .unwrap()
            .value()
            .to_string(),
    }
}

/// Registers a fresh user and logs them in.
pub async fn signed_in(app: &Router, role: &str) -> Session {
    let email = generate_unique_email();
    register_user(app, &email, role).await;
    login(app, &email).await
}

pub fn tamper_signature(token: &str) -> String {
    let (head, signature) = token.rsplit_once('.').unwrap();
    let mut bytes = signature.as_bytes().to_vec();
    let mid = bytes.len() / 2;
    bytes[mid] = if bytes[mid] == b'A' { b'B' } else { b'A' };
    format!("{}.{}", head, String::from_utf8(bytes).unwrap())
}
