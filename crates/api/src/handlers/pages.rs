//! Minimal page handlers.
//!
//! The product's real pages are rendered client-side; these handlers
//! exist so the gatekeeper has navigable routes to guard and so the
//! server answers page requests with something sensible.

use axum::response::Html;

pub async fn home() -> Html<&'static str> {
    Html("<h1>Chess Trainer</h1><p>Master your chess openings.</p>")
}

pub async fn login_page() -> Html<&'static str> {
    Html("<h1>Log in</h1>")
}

pub async fn signup_page() -> Html<&'static str> {
    Html("<h1>Sign up</h1>")
}

pub async fn forgot_password_page() -> Html<&'static str> {
    Html("<h1>Forgot password</h1>")
}

pub async fn reset_password_page() -> Html<&'static str> {
    Html("<h1>Reset password</h1>")
}

pub async fn verify_email_page() -> Html<&'static str> {
    Html("<h1>Verify email</h1>")
}

pub async fn profile_page() -> Html<&'static str> {
    Html("<h1>Profile</h1>")
}
