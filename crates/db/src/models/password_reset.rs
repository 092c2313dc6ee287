//! Password-reset token model.

use chesstrainer_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A reset-token row from the `password_reset_tokens` table.
///
/// Single-use: consumed on a successful reset. The `user_id` uniqueness
/// constraint guarantees at most one live token per user.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
