//! Repository for the `sessions` table.

use drivepoints_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateSession, Session};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, jti, created_at, expires_at, revoked_at";

/// Provides operations on the session ledger.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (user_id, jti, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.user_id)
            .bind(&input.jti)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find the live session for a `(user_id, jti)` pair.
    ///
    /// This is the Session Gate's ledger check: only `revoked_at IS NULL`
    /// matters here -- the token's own expiry is enforced by JWT validation
    /// before the ledger is consulted.
    pub async fn find_active(
        pool: &PgPool,
        user_id: DbId,
        jti: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE user_id = $1 AND jti = $2 AND revoked_at IS NULL"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(user_id)
            .bind(jti)
            .fetch_optional(pool)
            .await
    }

    /// List a user's non-revoked sessions oldest-first (ties broken by id).
    ///
    /// The ordering is what makes the session limiter's eviction strictly FIFO.
    pub async fn list_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE user_id = $1 AND revoked_at IS NULL
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Revoke a single session by row id. Returns `true` if the row was live.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke the session identified by a `(user_id, jti)` pair (logout).
    ///
    /// Returns `true` if a live session was revoked; `false` when it was
    /// already revoked or never existed, so logout stays idempotent.
    pub async fn revoke_by_jti(
        pool: &PgPool,
        user_id: DbId,
        jti: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW()
             WHERE user_id = $1 AND jti = $2 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .bind(jti)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke all live sessions for a user. Returns the count revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW()
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete expired or revoked sessions. Returns the count of deleted rows.
    ///
    /// Called opportunistically at server startup; correctness never depends
    /// on it since the gate checks `revoked_at` per request.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM sessions WHERE expires_at < NOW() OR revoked_at IS NOT NULL",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
