//! Repository for the `password_reset_tokens` table.

use sqlx::PgPool;

use chesstrainer_core::types::{DbId, Timestamp};

use crate::models::password_reset::PasswordResetToken;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, token, expires_at, created_at";

/// Provides CRUD operations for password-reset tokens.
pub struct PasswordResetRepo;

impl PasswordResetRepo {
    /// Store a reset token for a user, supplanting any prior token.
    ///
    /// Delete-then-insert keeps the "at most one live token per user"
    /// invariant even if the uniqueness constraint were relaxed.
    pub async fn replace_for_user(
        pool: &PgPool,
        user_id: DbId,
        token: &str,
        expires_at: Timestamp,
    ) -> Result<PasswordResetToken, sqlx::Error> {
        sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        let query = format!(
            "INSERT INTO password_reset_tokens (user_id, token, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PasswordResetToken>(&query)
            .bind(user_id)
            .bind(token)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find an unexpired token by its opaque value.
    pub async fn find_valid(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<PasswordResetToken>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM password_reset_tokens
             WHERE token = $1 AND expires_at > NOW()"
        );
        sqlx::query_as::<_, PasswordResetToken>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Delete a token by row id. Tokens are single-use: the caller
    /// consumes the token as soon as the reset is accepted.
    pub async fn consume(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete expired tokens. Returns the count of deleted rows.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at < NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
