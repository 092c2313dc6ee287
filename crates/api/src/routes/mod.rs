pub mod auth;
pub mod health;
pub mod pages;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup            signup (public, rate-limited)
/// /auth/login             login (public, rate-limited)
/// /auth/logout            logout
/// /auth/session           current session
/// /auth/profile           get, update profile (requires session)
/// /auth/change-password   change password (requires session)
/// /auth/forgot-password   request reset link (public, rate-limited)
/// /auth/reset-password    reset via token (public)
/// /auth/verify-email      verify (POST) / resend (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/auth", auth::router())
}
