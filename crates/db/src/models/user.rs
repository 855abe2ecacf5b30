//! User entity model and DTOs.

use std::fmt;

use drivepoints_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Platform role. Stored as the Postgres enum type `user_role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Driver,
    Sponsor,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Driver => "DRIVER",
            Role::Sponsor => "SPONSOR",
            Role::Admin => "ADMIN",
        };
        f.write_str(s)
    }
}

/// Account status, independent of the soft-delete flag. Stored as the
/// Postgres enum type `account_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Active,
    Disabled,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Disabled => "DISABLED",
        };
        f.write_str(s)
    }
}

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses.
/// Use [`PublicUser`] or [`DeletedAccount`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub status: AccountStatus,
    pub sponsor_id: Option<DbId>,
    pub is_deleted: bool,
    pub deleted_at: Option<Timestamp>,
    pub deleted_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
pub struct CreateUser {
    pub username: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub sponsor_id: Option<DbId>,
}

/// Safe user projection for API responses (no hash, no lifecycle flags).
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: DbId,
    pub email: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Projection of a soft-deleted account for the admin restore listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeletedAccount {
    pub id: DbId,
    pub username: Option<String>,
    pub email: String,
    pub role: Role,
    pub deleted_at: Option<Timestamp>,
    pub deleted_by: Option<DbId>,
}
