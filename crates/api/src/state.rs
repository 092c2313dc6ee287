use std::sync::Arc;

use crate::config::ServerConfig;
use crate::notifications::mailer::Mailer;
use crate::ratelimit::RateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: chesstrainer_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Transactional email sender (best-effort).
    pub mailer: Arc<Mailer>,
    /// Fixed-window rate limiter for login/signup/reset requests.
    pub rate_limiter: Arc<RateLimiter>,
}
