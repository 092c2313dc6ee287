//! HTTP-level integration tests for signup, login, logout, and the
//! session endpoint.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get_with_cookie, login_user, post_json, send_json_with_cookie,
    session_cookie_value, signup_user,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

/// Successful signup returns 201, the user payload, and a session cookie.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_success(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "email": "Anna@Example.com",
        "password": "Testpass1",
        "confirm_password": "Testpass1",
        "first_name": "Anna",
        "last_name": "Rudolf",
    });
    let response = post_json(app, "/api/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie_value(&response);
    assert!(!cookie.is_empty());

    let json = body_json(response).await;
    // Email is normalized to lowercase.
    assert_eq!(json["data"]["email"], "anna@example.com");
    assert_eq!(json["data"]["first_name"], "Anna");
    assert_eq!(json["data"]["email_verified"], false);
}

/// Signing up with an email that already has an account is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_duplicate_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    signup_user(app.clone(), "dup@example.com").await;

    let body = serde_json::json!({
        "email": "dup@example.com",
        "password": "Testpass1",
        "confirm_password": "Testpass1",
        "first_name": "Second",
        "last_name": "Account",
    });
    let response = post_json(app, "/api/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "User with this email already exists");
}

/// A weak password is rejected with the policy explanation.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_weak_password(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "email": "weak@example.com",
        "password": "alllowercase",
        "confirm_password": "alllowercase",
        "first_name": "Weak",
        "last_name": "Password",
    });
    let response = post_json(app, "/api/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("uppercase letter"));
}

/// Mismatched password confirmation is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_password_mismatch(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "email": "mismatch@example.com",
        "password": "Testpass1",
        "confirm_password": "Otherpass1",
        "first_name": "Mis",
        "last_name": "Match",
    });
    let response = post_json(app, "/api/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Passwords do not match");
}

/// A malformed email produces a field-level validation error.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_invalid_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "email": "not-an-email",
        "password": "Testpass1",
        "confirm_password": "Testpass1",
        "first_name": "Bad",
        "last_name": "Email",
    });
    let response = post_json(app, "/api/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["details"]["email"].is_array());
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns the user payload and a session cookie.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let app = common::build_test_app(pool);
    signup_user(app.clone(), "login@example.com").await;

    let body = serde_json::json!({
        "email": "login@example.com",
        "password": "Testpass1",
    });
    let response = post_json(app, "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie_value(&response);
    assert!(!cookie.is_empty());

    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "login@example.com");
}

/// Wrong password and unknown email produce the identical 401 so the
/// endpoint cannot be used to probe which accounts exist.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_failures_are_uniform(pool: PgPool) {
    let app = common::build_test_app(pool);
    signup_user(app.clone(), "exists@example.com").await;

    let wrong_password = post_json(
        app.clone(),
        "/api/auth/login",
        serde_json::json!({ "email": "exists@example.com", "password": "Wrongpass1" }),
    )
    .await;
    let unknown_email = post_json(
        app,
        "/api/auth/login",
        serde_json::json!({ "email": "ghost@example.com", "password": "Whatever1" }),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a["error"], "Invalid email or password");
    assert_eq!(a["error"], b["error"]);
}

/// The sixth login attempt within the window is rejected with 429.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_rate_limited(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "ghost@example.com", "password": "Whatever1" });
    for _ in 0..5 {
        let response = post_json(app.clone(), "/api/auth/login", body.clone()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("x-ratelimit-remaining"));
    assert!(response.headers().contains_key("x-ratelimit-reset"));
}

// ---------------------------------------------------------------------------
// Session endpoint and logout
// ---------------------------------------------------------------------------

/// The session endpoint returns the live identity behind the cookie.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_session_endpoint(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = signup_user(app.clone(), "whoami@example.com").await;

    let response = get_with_cookie(app, "/api/auth/session", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "whoami@example.com");
}

/// No cookie means 401, not an error page or a redirect (API routes
/// bypass the gatekeeper).
#[sqlx::test(migrations = "../db/migrations")]
async fn test_session_endpoint_unauthenticated(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::get(app, "/api/auth/session").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes the session: the same credential is rejected on the
/// very next call even though it has not expired.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_session(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = signup_user(app.clone(), "bye@example.com").await;

    let response =
        send_json_with_cookie(app.clone(), "POST", "/api/auth/logout", serde_json::json!({}), &cookie)
            .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_with_cookie(app, "/api/auth/session", &cookie).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout is idempotent: a second logout with the same (now dead)
/// credential, or none at all, still succeeds.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_is_idempotent(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = signup_user(app.clone(), "twice@example.com").await;

    for _ in 0..2 {
        let response = send_json_with_cookie(
            app.clone(),
            "POST",
            "/api/auth/logout",
            serde_json::json!({}),
            &cookie,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // No cookie at all is also fine.
    let response = post_json(app, "/api/auth/logout", serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Two logins produce two independent sessions; revoking one leaves the
/// other valid.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_concurrent_sessions_are_independent(pool: PgPool) {
    let app = common::build_test_app(pool);
    signup_user(app.clone(), "multi@example.com").await;

    let cookie_a = login_user(app.clone(), "multi@example.com", "Testpass1").await;
    let cookie_b = login_user(app.clone(), "multi@example.com", "Testpass1").await;
    assert_ne!(cookie_a, cookie_b, "each login must get its own session");

    // Revoke session A.
    let response = send_json_with_cookie(
        app.clone(),
        "POST",
        "/api/auth/logout",
        serde_json::json!({}),
        &cookie_a,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // A is dead, B still works.
    let response = get_with_cookie(app.clone(), "/api/auth/session", &cookie_a).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = get_with_cookie(app, "/api/auth/session", &cookie_b).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// A syntactically valid but forged credential is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_forged_credential_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_with_cookie(app, "/api/auth/session", "forged.credential.value").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
