//! Page routes guarded by the gatekeeper.

use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Root-level page routes. The gatekeeper middleware decides who may
/// reach which page; everything not listed in its public set is
/// protected by default, including routes added here later.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/auth/login", get(pages::login_page))
        .route("/auth/signup", get(pages::signup_page))
        .route("/auth/forgot-password", get(pages::forgot_password_page))
        .route("/auth/reset-password", get(pages::reset_password_page))
        .route("/auth/verify-email", get(pages::verify_email_page))
        .route("/profile", get(pages::profile_page))
}
