//! Fixed-window in-memory rate limiter.
//!
//! Counters live in process memory behind a mutex; this is the only
//! shared mutable state outside the database. Good enough for a single
//! instance -- a multi-instance deployment would move the counters to a
//! shared store.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};

/// A rate-limit window configuration.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Window length.
    pub window: Duration,
    /// Maximum requests allowed per window.
    pub max_requests: u32,
}

/// Login attempts: 5 per 15 minutes per IP.
pub const LOGIN_LIMIT: RateLimitConfig = RateLimitConfig {
    window: Duration::from_secs(15 * 60),
    max_requests: 5,
};

/// Signups: 3 per hour per IP.
pub const SIGNUP_LIMIT: RateLimitConfig = RateLimitConfig {
    window: Duration::from_secs(60 * 60),
    max_requests: 3,
};

/// Password-reset requests: 3 per hour per IP.
pub const PASSWORD_RESET_LIMIT: RateLimitConfig = RateLimitConfig {
    window: Duration::from_secs(60 * 60),
    max_requests: 3,
};

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitOutcome {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

struct WindowEntry {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Fixed-window counter keyed by `"{scope}:{ip}"`.
#[derive(Default)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, WindowEntry>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit for `key` and report whether it is within limits.
    ///
    /// Expired windows are purged lazily on access, so the map stays
    /// bounded by the set of keys seen within the largest window.
    pub fn check(&self, key: &str, config: RateLimitConfig) -> RateLimitOutcome {
        let now = Utc::now();
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");

        windows.retain(|_, entry| entry.reset_at > now);

        let entry = windows.entry(key.to_string()).or_insert_with(|| WindowEntry {
            count: 0,
            reset_at: now
                + chrono::Duration::from_std(config.window)
                    .expect("window duration out of range"),
        });

        entry.count += 1;

        RateLimitOutcome {
            allowed: entry.count <= config.max_requests,
            remaining: config.max_requests.saturating_sub(entry.count),
            reset_at: entry.reset_at,
        }
    }
}

/// Best-effort client IP for rate-limit keying: `x-forwarded-for`, then
/// `x-real-ip`, else `"unknown"`.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Response headers advertising the caller's remaining budget.
pub fn rate_limit_headers(outcome: &RateLimitOutcome) -> [(&'static str, String); 2] {
    [
        ("x-ratelimit-remaining", outcome.remaining.to_string()),
        ("x-ratelimit-reset", outcome.reset_at.to_rfc3339()),
    ]
}
