//! Session ledger model and DTOs.

use drivepoints_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session row from the `sessions` table. One row per successful login,
/// correlated with the issued JWT through `jti`.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub jti: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

/// DTO for creating a new session.
pub struct CreateSession {
    pub user_id: DbId,
    pub jti: String,
    pub expires_at: Timestamp,
}
