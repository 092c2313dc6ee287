//! Periodic purge of expired sessions and reset tokens.
//!
//! Rows past `expires_at` are already logically dead (every validity
//! check filters on expiry), so the sweep is pure cleanup and safe to
//! run concurrently with any request.

use std::time::Duration;

use chesstrainer_db::repositories::{PasswordResetRepo, SessionRepo};
use chesstrainer_db::DbPool;

/// Interval between sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Start the hourly sweeper task. Abort the returned handle on shutdown.
pub fn start_sweeper(pool: DbPool) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        // The immediate first tick doubles as a startup sweep.
        loop {
            interval.tick().await;
            sweep_once(&pool).await;
        }
    })
}

/// Run a single sweep pass. Errors are logged; the caller keeps going.
pub async fn sweep_once(pool: &DbPool) {
    match SessionRepo::delete_expired(pool).await {
        Ok(count) if count > 0 => {
            tracing::info!(count, "Swept expired sessions");
        }
        Ok(_) => {}
        Err(e) => tracing::error!(error = %e, "Session sweep failed"),
    }

    match PasswordResetRepo::delete_expired(pool).await {
        Ok(count) if count > 0 => {
            tracing::info!(count, "Swept expired password-reset tokens");
        }
        Ok(_) => {}
        Err(e) => tracing::error!(error = %e, "Reset-token sweep failed"),
    }
}
