//! Repository for the `users` table.
//!
//! Normal lookups exclude soft-deleted rows; the `_include_deleted` variant
//! exists only for the admin restore flow.

use drivepoints_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::user::{CreateUser, DeletedAccount, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, role, status, sponsor_id, \
                        is_deleted, deleted_at, deleted_by, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new ACTIVE user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role, sponsor_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role)
            .bind(input.sponsor_id)
            .fetch_one(pool)
            .await
    }

    /// Find a non-deleted user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND NOT is_deleted");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a non-deleted user by normalized email.
    ///
    /// Callers must normalize (trim + lowercase) before lookup; rows are
    /// stored normalized.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1 AND NOT is_deleted");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by ID regardless of the soft-delete flag.
    ///
    /// Only for the admin restore flow; everything else must use
    /// [`UserRepo::find_by_id`].
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a user's username. Returns `true` if a non-deleted row was updated.
    pub async fn update_username(
        pool: &PgPool,
        id: DbId,
        username: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET username = $2, updated_at = NOW()
             WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .bind(username)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update a user's normalized email. Returns `true` if a non-deleted row
    /// was updated.
    pub async fn update_email(pool: &PgPool, id: DbId, email: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET email = $2, updated_at = NOW()
             WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .bind(email)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Transaction-scoped variant of [`UserRepo::update_password`], used when
    /// the password write must commit atomically with other statements
    /// (reset-token consumption).
    pub async fn update_password_tx(
        conn: &mut PgConnection,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a user: set the flag, stamp the time, record the actor.
    ///
    /// Returns `true` if the row was live and is now deleted; `false` when
    /// the user does not exist or was already soft-deleted (idempotent).
    pub async fn soft_delete(
        pool: &PgPool,
        id: DbId,
        deleted_by: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users
             SET is_deleted = TRUE, deleted_at = NOW(), deleted_by = $2, updated_at = NOW()
             WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .bind(deleted_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the soft-delete triple. Returns `true` if a deleted row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users
             SET is_deleted = FALSE, deleted_at = NULL, deleted_by = NULL, updated_at = NOW()
             WHERE id = $1 AND is_deleted",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List soft-deleted accounts, most recently deleted first.
    pub async fn list_deleted(pool: &PgPool) -> Result<Vec<DeletedAccount>, sqlx::Error> {
        sqlx::query_as::<_, DeletedAccount>(
            "SELECT id, username, email, role, deleted_at, deleted_by
             FROM users WHERE is_deleted
             ORDER BY deleted_at DESC",
        )
        .fetch_all(pool)
        .await
    }
}
