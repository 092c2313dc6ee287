//! Shared helpers for HTTP-level integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use chesstrainer_api::auth::token::AuthConfig;
use chesstrainer_api::config::ServerConfig;
use chesstrainer_api::notifications::mailer::{Mailer, MailerConfig};
use chesstrainer_api::ratelimit::RateLimiter;
use chesstrainer_api::router::build_app_router;
use chesstrainer_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and a known secret.
///
/// The mailer has no API key, so it runs in log-only dev mode and no
/// test ever performs network I/O.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        app_url: "http://localhost:3000".to_string(),
        auth: AuthConfig {
            session_secret: "integration-test-secret-with-enough-entropy".to_string(),
            session_duration_days: 7,
            extended_session_duration_days: 30,
            reset_token_expiry_mins: 60,
            verification_token_expiry_hours: 24,
            cookie_secure: false,
        },
        mailer: MailerConfig {
            api_key: None,
            from_email: "test@example.com".to_string(),
            api_base: "http://localhost:0".to_string(),
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware stack (gatekeeper, CORS, request
/// ID, timeout, tracing, panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: Arc::new(Mailer::new(config.mailer.clone())),
        rate_limiter: Arc::new(RateLimiter::new()),
    };

    build_app_router(state, &config)
}

/// Drive a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Drive a GET request carrying a session cookie.
pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, format!("session={cookie}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Drive a JSON request through the router.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Drive a JSON request carrying a session cookie.
pub async fn send_json_with_cookie(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, format!("session={cookie}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "POST", uri, body).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body must be valid JSON")
}

/// Extract the session credential from a response's Set-Cookie header.
///
/// Panics if the response carries no session cookie.
pub fn session_cookie_value(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response must carry a Set-Cookie header")
        .to_str()
        .unwrap();
    let (name_value, _) = set_cookie.split_once(';').unwrap_or((set_cookie, ""));
    let (name, value) = name_value.split_once('=').expect("malformed cookie");
    assert_eq!(name, "session");
    value.to_string()
}

/// Sign up a user through the API and return the session credential.
pub async fn signup_user(app: Router, email: &str) -> String {
    let body = serde_json::json!({
        "email": email,
        "password": "Testpass1",
        "confirm_password": "Testpass1",
        "first_name": "Magnus",
        "last_name": "Karlsen",
    });
    let response = post_json(app, "/api/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    session_cookie_value(&response)
}

/// Log in through the API and return the session credential.
pub async fn login_user(app: Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie_value(&response)
}
