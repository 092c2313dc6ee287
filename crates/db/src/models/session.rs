//! Session model and DTOs.

use chesstrainer_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session row from the `sessions` table.
///
/// The row is the authoritative record for a login; the signed credential
/// held by the client is only honored while a matching unexpired row exists.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub session_id: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for creating a new session.
pub struct CreateSession {
    pub user_id: DbId,
    pub session_id: String,
    pub expires_at: Timestamp,
}
