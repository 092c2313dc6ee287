//! Authenticated-session extractor for Axum handlers.
//!
//! Unlike the gatekeeper's cheap signature check, this extractor performs
//! the authoritative validation: codec verify, then the session-store
//! existence check, then a live re-read of the account. Handlers that
//! mutate sensitive state (password change, profile edits) rely on this
//! one so revocation takes effect immediately.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use chesstrainer_core::error::CoreError;

use crate::auth::session::{resolve_session, SessionIdentity, SESSION_COOKIE_NAME};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated session extracted from the `session` cookie.
///
/// Use as an extractor parameter in any handler that requires an
/// authenticated, non-revoked session:
///
/// ```ignore
/// async fn my_handler(session: AuthSession) -> AppResult<Json<()>> {
///     tracing::info!(user_id = session.identity.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub identity: SessionIdentity,
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(SESSION_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Not authenticated".into())))?;

        // Missing, expired, and revoked all collapse to the same rejection.
        let identity = resolve_session(&state.pool, &state.config.auth, &token)
            .await
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Not authenticated".into())))?;

        Ok(AuthSession { identity })
    }
}
