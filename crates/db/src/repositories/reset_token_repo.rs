//! Repository for the `password_reset_tokens` table.

use drivepoints_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::reset_token::PasswordResetToken;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, token, expires_at, used, created_at";

/// Provides operations on password reset tokens.
pub struct ResetTokenRepo;

impl ResetTokenRepo {
    /// Insert a new reset token, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        token: &str,
        expires_at: Timestamp,
    ) -> Result<PasswordResetToken, sqlx::Error> {
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

    /// Find a token that is unused and not yet expired.
    pub async fn find_valid(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<PasswordResetToken>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM password_reset_tokens
             WHERE token = $1 AND used = FALSE AND expires_at > NOW()"
        );
        sqlx::query_as::<_, PasswordResetToken>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user's tokens that are already used or expired.
    ///
    /// Run before issuing a new token so a user never accumulates dead rows.
    /// Outstanding valid tokens are kept; requesting twice yields two live
    /// tokens and either may be consumed first.
    pub async fn purge_stale_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM password_reset_tokens
             WHERE user_id = $1 AND (used = TRUE OR expires_at <= NOW())",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark a token as consumed, inside the caller's transaction.
    ///
    /// The `used = FALSE` predicate makes concurrent consumers race safely:
    /// exactly one caller sees `true`.
    pub async fn mark_used_tx(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE password_reset_tokens SET used = TRUE WHERE id = $1 AND used = FALSE",
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
