//! Handlers for the `/api/auth` resource (signup, login, logout, session,
//! password reset, email verification).

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use chesstrainer_core::error::CoreError;
use chesstrainer_core::password_policy::validate_password_strength;
use chesstrainer_core::types::DbId;
use chesstrainer_db::models::user::{CreateUser, User};
use chesstrainer_db::repositories::{PasswordResetRepo, UserRepo};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{
    clear_session_cookie, end_session, invalidate_all_sessions, session_cookie, start_session,
    SESSION_COOKIE_NAME,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthSession;
use crate::ratelimit::{client_ip, LOGIN_LIMIT, PASSWORD_RESET_LIMIT, SIGNUP_LIMIT};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Request body for `POST /api/auth/forgot-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Request body for `POST /api/auth/reset-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request body for `POST /api/auth/change-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

/// Request body for `POST /api/auth/verify-email`.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Query parameters for `GET /api/auth/verify-email` (resend).
#[derive(Debug, Deserialize)]
pub struct ResendVerificationQuery {
    pub email: String,
}

/// Public user info returned by auth and profile endpoints.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub email_verified: bool,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email_verified: user.email_verified,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/signup
///
/// Create an account, send a verification email (best-effort), and log
/// the new user straight in.
pub async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, CookieJar, Json<DataResponse<UserInfo>>)> {
    let ip = client_ip(&headers);
    let outcome = state.rate_limiter.check(&format!("signup:{ip}"), SIGNUP_LIMIT);
    if !outcome.allowed {
        return Err(AppError::RateLimited {
            message: "Too many signup attempts. Please try again later.",
            outcome,
        });
    }

    input.validate()?;
    check_new_password(&input.password, &input.confirm_password)?;

    let email = input.email.trim().to_lowercase();

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "User with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let verification_token = Uuid::new_v4().to_string();
    let verification_expires =
        Utc::now() + Duration::hours(state.config.auth.verification_token_expiry_hours);

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            password_hash,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email_verification_token: Some(verification_token.clone()),
            email_verification_expires: Some(verification_expires),
        },
    )
    .await?;

    // Best-effort: the user can request a resend later.
    let verification_url = format!(
        "{}/auth/verify-email?token={verification_token}",
        state.config.app_url
    );
    if let Err(e) = state
        .mailer
        .send_verification_email(&user.email, &user.first_name, &verification_url)
        .await
    {
        tracing::warn!(error = %e, user_id = user.id, "Failed to send verification email");
    }

    let started = start_session(&state.pool, &state.config.auth, user.id, false)
        .await
        .map_err(|e| AppError::InternalError(format!("Session creation error: {e}")))?;
    let jar = jar.add(session_cookie(&started, &state.config.auth));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(DataResponse {
            data: UserInfo::from(&user),
        }),
    ))
}

/// POST /api/auth/login
///
/// Authenticate with email + password; on success, start a session and
/// set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<DataResponse<UserInfo>>)> {
    let ip = client_ip(&headers);
    let outcome = state.rate_limiter.check(&format!("login:{ip}"), LOGIN_LIMIT);
    if !outcome.allowed {
        return Err(AppError::RateLimited {
            message: "Too many login attempts. Please try again later.",
            outcome,
        });
    }

    input.validate()?;

    let email = input.email.trim().to_lowercase();

    // Unknown email and wrong password produce the same response so the
    // endpoint cannot be used to enumerate accounts.
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    let started = start_session(&state.pool, &state.config.auth, user.id, input.remember_me)
        .await
        .map_err(|e| AppError::InternalError(format!("Session creation error: {e}")))?;
    let jar = jar.add(session_cookie(&started, &state.config.auth));

    Ok((
        jar,
        Json(DataResponse {
            data: UserInfo::from(&user),
        }),
    ))
}

/// POST /api/auth/logout
///
/// Delete the session row (if the credential decodes) and clear the
/// cookie. Idempotent: never fails, even with no or a garbage cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        end_session(&state.pool, &state.config.auth, cookie.value()).await;
    }

    let jar = jar.add(clear_session_cookie(&state.config.auth));
    (
        jar,
        Json(MessageResponse {
            message: "Logout successful",
        }),
    )
}

/// GET /api/auth/session
///
/// Return the identity behind the current session, 401 if there is none.
pub async fn current_session(session: AuthSession) -> Json<DataResponse<UserInfo>> {
    let identity = session.identity;
    Json(DataResponse {
        data: UserInfo {
            id: identity.user_id,
            email: identity.email,
            first_name: identity.first_name,
            last_name: identity.last_name,
            email_verified: identity.email_verified,
        },
    })
}

/// POST /api/auth/change-password
///
/// Verify the current password, store the new hash, revoke every session
/// for the account, then start a fresh one so the acting device stays
/// logged in.
pub async fn change_password(
    State(state): State<AppState>,
    session: AuthSession,
    jar: CookieJar,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    input.validate()?;
    check_new_password(&input.new_password, &input.confirm_new_password)?;

    let user_id = session.identity.user_id;
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::BadRequest(
            "Current password is incorrect".into(),
        ));
    }

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::set_password(&state.pool, user_id, &new_hash).await?;

    // Every other device must reauthenticate with the new password.
    invalidate_all_sessions(&state.pool, user_id).await?;

    let started = start_session(&state.pool, &state.config.auth, user_id, false)
        .await
        .map_err(|e| AppError::InternalError(format!("Session creation error: {e}")))?;
    let jar = jar.add(session_cookie(&started, &state.config.auth));

    Ok((
        jar,
        Json(MessageResponse {
            message: "Password changed successfully",
        }),
    ))
}

/// POST /api/auth/forgot-password
///
/// Issue a reset token and email the reset link. The response is the
/// same whether or not the account exists.
pub async fn forgot_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let ip = client_ip(&headers);
    let outcome = state
        .rate_limiter
        .check(&format!("password-reset:{ip}"), PASSWORD_RESET_LIMIT);
    if !outcome.allowed {
        return Err(AppError::RateLimited {
            message: "Too many password reset attempts. Please try again later.",
            outcome,
        });
    }

    input.validate()?;

    let uniform_response = Json(MessageResponse {
        message: "If an account with that email exists, a password reset link will be sent.",
    });

    let email = input.email.trim().to_lowercase();
    let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? else {
        return Ok(uniform_response);
    };

    let token = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::minutes(state.config.auth.reset_token_expiry_mins);

    // Supplants any prior token for this user.
    PasswordResetRepo::replace_for_user(&state.pool, user.id, &token, expires_at).await?;

    let reset_url = format!("{}/auth/reset-password?token={token}", state.config.app_url);
    if let Err(e) = state
        .mailer
        .send_password_reset_email(&user.email, &user.first_name, &reset_url)
        .await
    {
        // Best-effort; the uniform response must not reveal the failure.
        tracing::warn!(error = %e, user_id = user.id, "Failed to send password reset email");
    }

    Ok(uniform_response)
}

/// POST /api/auth/reset-password
///
/// Consume a reset token, store the new password, and revoke every
/// session for the account.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    input.validate()?;
    check_new_password(&input.password, &input.confirm_password)?;

    let reset = PasswordResetRepo::find_valid(&state.pool, &input.token)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired reset token".into()))?;

    let user = UserRepo::find_by_id(&state.pool, reset.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: reset.user_id,
        }))?;

    // Single-use: consume before the password write so the token cannot
    // be replayed whatever happens downstream.
    PasswordResetRepo::consume(&state.pool, reset.id).await?;

    let new_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::set_password(&state.pool, user.id, &new_hash).await?;

    invalidate_all_sessions(&state.pool, user.id).await?;

    Ok(Json(MessageResponse {
        message: "Password reset successful. Please login with your new password.",
    }))
}

/// POST /api/auth/verify-email
///
/// Mark the account holding this verification token as verified.
pub async fn verify_email(
    State(state): State<AppState>,
    Json(input): Json<VerifyEmailRequest>,
) -> AppResult<Json<MessageResponse>> {
    input.validate()?;

    let user = UserRepo::verify_email(&state.pool, &input.token)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("Invalid or expired verification token".into())
        })?;

    // Best-effort; verification already succeeded.
    if let Err(e) = state
        .mailer
        .send_welcome_email(&user.email, &user.first_name)
        .await
    {
        tracing::warn!(error = %e, user_id = user.id, "Failed to send welcome email");
    }

    Ok(Json(MessageResponse {
        message: "Email verified successfully!",
    }))
}

/// GET /api/auth/verify-email?email=...
///
/// Rotate the verification token and resend the email. Unknown
/// addresses get the same response as known ones.
pub async fn resend_verification(
    State(state): State<AppState>,
    Query(query): Query<ResendVerificationQuery>,
) -> AppResult<Json<MessageResponse>> {
    let email = query.email.trim().to_lowercase();

    let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? else {
        return Ok(Json(MessageResponse {
            message: "If an account exists, a verification email will be sent.",
        }));
    };

    if user.email_verified {
        return Err(AppError::BadRequest("Email is already verified".into()));
    }

    let token = Uuid::new_v4().to_string();
    let expires_at =
        Utc::now() + Duration::hours(state.config.auth.verification_token_expiry_hours);
    UserRepo::set_verification_token(&state.pool, user.id, &token, expires_at).await?;

    let verification_url = format!("{}/auth/verify-email?token={token}", state.config.app_url);
    state
        .mailer
        .send_verification_email(&user.email, &user.first_name, &verification_url)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to send verification email: {e}")))?;

    Ok(Json(MessageResponse {
        message: "Verification email sent",
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Enforce the password policy and the confirmation match for any flow
/// that sets a new password.
fn check_new_password(password: &str, confirmation: &str) -> Result<(), AppError> {
    validate_password_strength(password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    if password != confirmation {
        return Err(AppError::Core(CoreError::Validation(
            "Passwords do not match".into(),
        )));
    }
    Ok(())
}
