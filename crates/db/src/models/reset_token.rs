//! Password reset token model.

use drivepoints_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from `password_reset_tokens`. Valid iff `used` is false and
/// `expires_at` is in the future; consumption is irreversible.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token: String,
    pub expires_at: Timestamp,
    pub used: bool,
    pub created_at: Timestamp,
}
