//! Session credential codec.
//!
//! A credential is an HS256-signed JWT binding a user id and an opaque
//! session id, with an expiration matching the server-side session row.
//! Verification is deliberately a single yes/no outcome: malformed input,
//! a bad signature, and an expired claim are indistinguishable to callers
//! so the codec cannot be used as an oracle.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use chesstrainer_core::types::{DbId, Timestamp};

/// Claims embedded in every session credential.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The opaque session identifier matching the store row.
    pub sid: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// The identifiers recovered from a verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: DbId,
    pub session_id: String,
}

/// Configuration for credential signing and session durations.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret used to sign and verify credentials.
    pub session_secret: String,
    /// Normal session lifetime in days (default: 7).
    pub session_duration_days: i64,
    /// "Remember me" session lifetime in days (default: 30).
    pub extended_session_duration_days: i64,
    /// Reset-token lifetime in minutes (default: 60).
    pub reset_token_expiry_mins: i64,
    /// Email-verification token lifetime in hours (default: 24).
    pub verification_token_expiry_hours: i64,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
}

/// Default normal session lifetime in days.
const DEFAULT_SESSION_DAYS: i64 = 7;
/// Default extended ("remember me") session lifetime in days.
const DEFAULT_EXTENDED_SESSION_DAYS: i64 = 30;
/// Default reset-token lifetime in minutes.
const DEFAULT_RESET_EXPIRY_MINS: i64 = 60;
/// Default verification-token lifetime in hours.
const DEFAULT_VERIFICATION_EXPIRY_HOURS: i64 = 24;

impl AuthConfig {
    /// Load auth configuration from environment variables.
    ///
    /// | Env Var                           | Required | Default |
    /// |-----------------------------------|----------|---------|
    /// | `SESSION_SECRET`                  | **yes**  | --      |
    /// | `SESSION_DURATION_DAYS`           | no       | `7`     |
    /// | `EXTENDED_SESSION_DURATION_DAYS`  | no       | `30`    |
    /// | `RESET_TOKEN_EXPIRY_MINS`         | no       | `60`    |
    /// | `VERIFICATION_TOKEN_EXPIRY_HOURS` | no       | `24`    |
    /// | `COOKIE_SECURE`                   | no       | `false` |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_SECRET` is not set or is empty. A silent
    /// fallback to a well-known development key would let every
    /// deployment that forgot the variable accept forged credentials,
    /// so misconfiguration is fatal at startup instead.
    pub fn from_env() -> Self {
        let session_secret =
            std::env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in the environment");
        assert!(!session_secret.is_empty(), "SESSION_SECRET must not be empty");

        let session_duration_days: i64 = std::env::var("SESSION_DURATION_DAYS")
            .unwrap_or_else(|_| DEFAULT_SESSION_DAYS.to_string())
            .parse()
            .expect("SESSION_DURATION_DAYS must be a valid i64");

        let extended_session_duration_days: i64 = std::env::var("EXTENDED_SESSION_DURATION_DAYS")
            .unwrap_or_else(|_| DEFAULT_EXTENDED_SESSION_DAYS.to_string())
            .parse()
            .expect("EXTENDED_SESSION_DURATION_DAYS must be a valid i64");

        let reset_token_expiry_mins: i64 = std::env::var("RESET_TOKEN_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_RESET_EXPIRY_MINS.to_string())
            .parse()
            .expect("RESET_TOKEN_EXPIRY_MINS must be a valid i64");

        let verification_token_expiry_hours: i64 =
            std::env::var("VERIFICATION_TOKEN_EXPIRY_HOURS")
                .unwrap_or_else(|_| DEFAULT_VERIFICATION_EXPIRY_HOURS.to_string())
                .parse()
                .expect("VERIFICATION_TOKEN_EXPIRY_HOURS must be a valid i64");

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self {
            session_secret,
            session_duration_days,
            extended_session_duration_days,
            reset_token_expiry_mins,
            verification_token_expiry_hours,
            cookie_secure,
        }
    }
}

/// Issue an HS256-signed credential for the given user and session.
pub fn issue_session_token(
    user_id: DbId,
    session_id: &str,
    expires_at: Timestamp,
    config: &AuthConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id,
        sid: session_id.to_string(),
        exp: expires_at.timestamp(),
        iat: chrono::Utc::now().timestamp(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.session_secret.as_bytes()),
    )
}

/// Verify a credential's signature and expiration, returning the embedded
/// identifiers only when both checks pass.
///
/// A credential is invalid from the exact `expires_at` instant onward
/// (`now >= exp`). The library's own exp check only rejects once
/// `exp < now`, which leaves the whole expiry second valid, so the
/// boundary is enforced explicitly after decoding. All failure modes
/// collapse to `None`.
pub fn verify_session_token(token: &str, config: &AuthConfig) -> Option<SessionClaims> {
    let mut validation = Validation::default(); // HS256, validates exp
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.session_secret.as_bytes()),
        &validation,
    )
    .ok()?;

    if chrono::Utc::now().timestamp() >= data.claims.exp {
        return None;
    }

    Some(SessionClaims {
        user_id: data.claims.sub,
        session_id: data.claims.sid,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    /// Helper to build a test config with a known secret.
    pub(crate) fn test_config() -> AuthConfig {
        AuthConfig {
            session_secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            session_duration_days: 7,
            extended_session_duration_days: 30,
            reset_token_expiry_mins: 60,
            verification_token_expiry_hours: 24,
            cookie_secure: false,
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let config = test_config();
        let expires_at = Utc::now() + Duration::days(7);
        let token = issue_session_token(42, "session-abc", expires_at, &config)
            .expect("token issuing should succeed");

        let claims = verify_session_token(&token, &config).expect("credential should verify");
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.session_id, "session-abc");
    }

    #[test]
    fn test_expired_credential_is_invalid() {
        let config = test_config();

        // Already past its expiration instant.
        let expires_at = Utc::now() - Duration::seconds(1);
        let token = issue_session_token(1, "stale", expires_at, &config)
            .expect("token issuing should succeed");

        assert!(
            verify_session_token(&token, &config).is_none(),
            "expired credential must be invalid even with a correct signature"
        );
    }

    #[test]
    fn test_credential_invalid_at_exact_expiry_instant() {
        let config = test_config();

        // exp == now: already invalid, not valid until the second rolls
        // over.
        let expires_at = Utc::now();
        let token = issue_session_token(1, "boundary", expires_at, &config)
            .expect("token issuing should succeed");

        assert!(
            verify_session_token(&token, &config).is_none(),
            "credential must be invalid once now >= exp"
        );
    }

    #[test]
    fn test_malformed_input_is_invalid() {
        let config = test_config();
        assert!(verify_session_token("", &config).is_none());
        assert!(verify_session_token("not-a-jwt", &config).is_none());
        assert!(verify_session_token("a.b.c", &config).is_none());
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = AuthConfig {
            session_secret: "secret-alpha".to_string(),
            ..test_config()
        };
        let config_b = AuthConfig {
            session_secret: "secret-bravo".to_string(),
            ..test_config()
        };

        let expires_at = Utc::now() + Duration::days(1);
        let token = issue_session_token(1, "s1", expires_at, &config_a)
            .expect("token issuing should succeed");

        assert!(
            verify_session_token(&token, &config_b).is_none(),
            "credential signed with a different secret must be invalid"
        );
    }

    #[test]
    fn test_tampered_payload_fails() {
        let config = test_config();
        let expires_at = Utc::now() + Duration::days(1);
        let token = issue_session_token(7, "s7", expires_at, &config)
            .expect("token issuing should succeed");

        // Flip a character in the payload segment.
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");

        assert!(verify_session_token(&tampered, &config).is_none());
    }
}
