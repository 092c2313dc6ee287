//! Repository for the `sessions` table.
//!
//! A session row is the server-side half of a login: the signed credential
//! a client holds is only honored while a matching unexpired row exists,
//! which is what makes instant revocation (logout, logout-everywhere)
//! possible.

use sqlx::PgPool;

use chesstrainer_core::types::DbId;

use crate::models::session::{CreateSession, Session};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, session_id, expires_at, created_at";

/// Provides CRUD operations for sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    ///
    /// No per-user uniqueness: a user may hold many concurrent sessions
    /// (one per device).
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (user_id, session_id, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.user_id)
            .bind(&input.session_id)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Authoritative validity check: true iff a row with this
    /// `user_id` + `session_id` pair exists and has not expired.
    ///
    /// A deleted row invalidates an otherwise well-signed credential
    /// immediately.
    pub async fn is_valid(
        pool: &PgPool,
        user_id: DbId,
        session_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let exists: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM sessions
             WHERE user_id = $1 AND session_id = $2 AND expires_at > NOW()",
        )
        .bind(user_id)
        .bind(session_id)
        .fetch_optional(pool)
        .await?;
        Ok(exists.is_some())
    }

    /// Delete a single session. Idempotent: returns `true` if a row was
    /// removed, `false` if none matched.
    pub async fn delete_one(
        pool: &PgPool,
        user_id: DbId,
        session_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND session_id = $2")
            .bind(user_id)
            .bind(session_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every session for a user. Returns the count of deleted rows.
    ///
    /// Used for logout-everywhere and mandatory invalidation after a
    /// password change or reset.
    pub async fn delete_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete expired sessions. Returns the count of deleted rows.
    ///
    /// Pure cleanup: never removes a still-valid row, safe to run
    /// concurrently with any other operation.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
