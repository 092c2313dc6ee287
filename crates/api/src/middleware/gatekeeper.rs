//! Page-navigation gatekeeper.
//!
//! Runs ahead of every page route and redirects based on route class and
//! credential validity. This layer checks only the credential signature
//! and expiry -- it does NOT consult the session store, trading a window
//! of accepting a revoked-but-unexpired credential for avoiding a
//! database round trip on every navigation. Handlers that need the
//! authoritative revocation check use [`crate::middleware::auth`].

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use crate::auth::session::SESSION_COOKIE_NAME;
use crate::auth::token::verify_session_token;
use crate::state::AppState;

/// Routes reachable without authentication.
const PUBLIC_ROUTES: [&str; 6] = [
    "/",
    "/auth/login",
    "/auth/signup",
    "/auth/forgot-password",
    "/auth/reset-password",
    "/auth/verify-email",
];

/// Routes an already-authenticated user is redirected away from.
const AUTH_ROUTES: [&str; 2] = ["/auth/login", "/auth/signup"];

/// How the gatekeeper treats a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Not a page navigation; the endpoint authenticates itself.
    Bypass,
    /// Reachable with or without a session.
    Public,
    /// Login/signup pages; authenticated users are sent home.
    AuthOnly,
    /// Everything else. New pages default to protected (default-deny).
    Protected,
}

/// Classify a request path.
pub fn classify(path: &str) -> RouteClass {
    // Data APIs, health probes, and static assets are not page
    // navigations; they answer for themselves.
    if path.starts_with("/api")
        || path == "/health"
        || path.starts_with("/assets")
        || path.starts_with("/favicon")
        || path.contains('.')
    {
        return RouteClass::Bypass;
    }
    if AUTH_ROUTES.contains(&path) {
        return RouteClass::AuthOnly;
    }
    if PUBLIC_ROUTES.contains(&path) {
        return RouteClass::Public;
    }
    RouteClass::Protected
}

/// Gatekeeper middleware, applied over the whole router.
pub async fn gatekeeper(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let class = classify(&path);
    if class == RouteClass::Bypass {
        return next.run(request).await;
    }

    let has_valid_credential = jar
        .get(SESSION_COOKIE_NAME)
        .map(|cookie| verify_session_token(cookie.value(), &state.config.auth).is_some())
        .unwrap_or(false);

    match class {
        RouteClass::AuthOnly if has_valid_credential => Redirect::to("/").into_response(),
        RouteClass::Protected if !has_valid_credential => {
            Redirect::to(&format!("/auth/login?callbackUrl={path}")).into_response()
        }
        _ => next.run(request).await,
    }
}
