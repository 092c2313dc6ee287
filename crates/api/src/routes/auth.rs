//! Route definitions for the `/api/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, profile};
use crate::state::AppState;

/// Routes mounted at `/api/auth`.
///
/// ```text
/// POST  /signup           -> signup
/// POST  /login            -> login
/// POST  /logout           -> logout
/// GET   /session          -> current_session (requires session)
/// GET   /profile          -> get_profile (requires session)
/// PATCH /profile          -> update_profile (requires session)
/// POST  /change-password  -> change_password (requires session)
/// POST  /forgot-password  -> forgot_password
/// POST  /reset-password   -> reset_password
/// POST  /verify-email     -> verify_email
/// GET   /verify-email     -> resend_verification
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::current_session))
        .route(
            "/profile",
            get(profile::get_profile).patch(profile::update_profile),
        )
        .route("/change-password", post(auth::change_password))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route(
            "/verify-email",
            post(auth::verify_email).get(auth::resend_verification),
        )
}
