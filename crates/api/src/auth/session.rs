//! Session lifecycle orchestration.
//!
//! Ties the credential codec to the persisted session store. The store is
//! the source of truth: a credential is only honored while its matching
//! row exists and is unexpired, so deleting rows revokes access
//! immediately regardless of the credential's own lifetime.
//!
//! Every operation here treats lower-layer failure (decode failure,
//! store unavailability) as "no session" rather than an error; being
//! unauthenticated is the default state, not an exceptional one.

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use chesstrainer_core::types::{DbId, Timestamp};
use chesstrainer_db::models::session::CreateSession;
use chesstrainer_db::repositories::{SessionRepo, UserRepo};

use crate::auth::token::{issue_session_token, verify_session_token, AuthConfig};

/// Name of the cookie carrying the session credential.
pub const SESSION_COOKIE_NAME: &str = "session";

/// The authenticated identity behind a validated session.
///
/// User attributes are re-read from the account store on every
/// resolution, so they reflect the latest values rather than a snapshot
/// taken at login time.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub user_id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub email_verified: bool,
    pub session_id: String,
}

/// A freshly started session: the signed credential plus its expiry.
#[derive(Debug, Clone)]
pub struct StartedSession {
    pub token: String,
    pub expires_at: Timestamp,
    /// Whether the extended ("remember me") duration was applied.
    pub extended: bool,
}

/// Start a new session for a user: generate a fresh session id, persist
/// the store row, and issue the matching credential.
///
/// Two concurrent logins get independent, non-colliding session ids and
/// both stay valid until each is individually or bulk revoked.
pub async fn start_session(
    pool: &PgPool,
    config: &AuthConfig,
    user_id: DbId,
    extended: bool,
) -> Result<StartedSession, SessionError> {
    let session_id = Uuid::new_v4().to_string();
    let days = if extended {
        config.extended_session_duration_days
    } else {
        config.session_duration_days
    };
    let expires_at = Utc::now() + Duration::days(days);

    SessionRepo::create(
        pool,
        &CreateSession {
            user_id,
            session_id: session_id.clone(),
            expires_at,
        },
    )
    .await?;

    let token = issue_session_token(user_id, &session_id, expires_at, config)?;

    Ok(StartedSession {
        token,
        expires_at,
        extended,
    })
}

/// Validate a credential against the store and return the identity
/// behind it, or `None` for anything that is not a live session.
///
/// Expired-and-swept, explicitly revoked, and never-existed are all
/// indistinguishable to the caller.
pub async fn resolve_session(
    pool: &PgPool,
    config: &AuthConfig,
    token: &str,
) -> Option<SessionIdentity> {
    let claims = verify_session_token(token, config)?;

    let valid = SessionRepo::is_valid(pool, claims.user_id, &claims.session_id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Session store lookup failed; treating as no session");
            false
        });
    if !valid {
        return None;
    }

    let user = UserRepo::find_by_id(pool, claims.user_id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "User lookup failed; treating as no session");
            None
        })?;

    Some(SessionIdentity {
        user_id: user.id,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        email_verified: user.email_verified,
        session_id: claims.session_id,
    })
}

/// End the session behind a credential, if it decodes.
///
/// Idempotent: an invalid credential or an already-deleted row is not an
/// error. The caller always clears the cookie afterward, whatever the
/// outcome here.
pub async fn end_session(pool: &PgPool, config: &AuthConfig, token: &str) {
    if let Some(claims) = verify_session_token(token, config) {
        if let Err(e) = SessionRepo::delete_one(pool, claims.user_id, &claims.session_id).await {
            tracing::warn!(error = %e, "Failed to delete session row during logout");
        }
    }
}

/// Delete every session for a user, forcing reauthentication on all
/// devices. Called after a password change or reset; the acting device
/// is expected to start itself a fresh session immediately afterward.
pub async fn invalidate_all_sessions(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
    SessionRepo::delete_all_for_user(pool, user_id).await
}

/// Possible failures when starting a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session store error: {0}")]
    Store(#[from] sqlx::Error),
    #[error("credential signing error: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Build the session cookie for a freshly issued credential.
///
/// HTTP-only, SameSite=Lax, path `/`, `Secure` per configuration, with a
/// max-age matching the session duration.
pub fn session_cookie(started: &StartedSession, config: &AuthConfig) -> Cookie<'static> {
    let days = if started.extended {
        config.extended_session_duration_days
    } else {
        config.session_duration_days
    };

    Cookie::build((SESSION_COOKIE_NAME, started.token.clone()))
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::days(days))
        .build()
}

/// Build the removal cookie that discards the client's credential.
pub fn clear_session_cookie(config: &AuthConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}
