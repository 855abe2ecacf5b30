//! Handlers for the `/account` resource: soft delete, restore, and the
//! admin view of deleted accounts.
//!
//! Deletion audits are written BEFORE the mutation so the trail survives
//! even if the update itself fails.

use axum::extract::{Path, State};
use axum::Json;
use drivepoints_core::audit::categories;
use drivepoints_core::error::CoreError;
use drivepoints_core::types::DbId;
use drivepoints_db::models::audit::CreateAuditLog;
use drivepoints_db::models::user::{DeletedAccount, Role};
use drivepoints_db::repositories::{AuditLogRepo, SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::middleware::session::SessionUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `DELETE /account`.
#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: Option<String>,
}

/// Response for `DELETE /account`.
#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub message: &'static str,
}

/// Summary of the user an admin just deleted.
#[derive(Debug, Serialize)]
pub struct DeletedUserSummary {
    pub id: DbId,
    pub username: Option<String>,
    pub email: String,
}

/// Response for `DELETE /account/admin/{userId}`.
#[derive(Debug, Serialize)]
pub struct AdminDeleteResponse {
    pub message: &'static str,
    #[serde(rename = "deletedUser")]
    pub deleted_user: DeletedUserSummary,
}

/// Summary of a restored user.
#[derive(Debug, Serialize)]
pub struct RestoredUserSummary {
    pub id: DbId,
    pub username: Option<String>,
    pub email: String,
    pub role: Role,
}

/// Response for `POST /account/admin/{userId}/restore`.
#[derive(Debug, Serialize)]
pub struct RestoreResponse {
    pub message: &'static str,
    #[serde(rename = "restoredUser")]
    pub restored_user: RestoredUserSummary,
}

/// Response for `GET /account/admin/deleted`.
#[derive(Debug, Serialize)]
pub struct DeletedListResponse {
    pub count: usize,
    #[serde(rename = "deletedAccounts")]
    pub deleted_accounts: Vec<DeletedAccount>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// DELETE /account
///
/// Self-service soft delete. The caller must re-supply their current
/// password, so a hijacked session alone cannot destroy the account.
pub async fn delete_account(
    State(state): State<AppState>,
    user: SessionUser,
    Json(input): Json<DeleteAccountRequest>,
) -> AppResult<Json<DeleteAccountResponse>> {
    let password = input
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("Password is required".into())))?;

    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: user.user_id,
        }))?;

    let password_valid = verify_password(&password, &row.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Incorrect password".into(),
        )));
    }

    // Audit first, then mutate.
    AuditLogRepo::record_best_effort(
        &state.pool,
        &CreateAuditLog::new(categories::ACCOUNT_DELETED, Some(row.id), Some(row.id))
            .details(format!("self-service deletion of {}", row.email)),
    )
    .await;

    UserRepo::soft_delete(&state.pool, row.id, Some(row.id)).await?;
    SessionRepo::revoke_all_for_user(&state.pool, row.id).await?;

    Ok(Json(DeleteAccountResponse {
        message: "Account deleted successfully",
    }))
}

/// DELETE /account/admin/{userId}
///
/// Admin soft delete of another account. Admins cannot delete themselves.
pub async fn admin_delete_account(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<AdminDeleteResponse>> {
    if user_id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Admins cannot delete their own account".into(),
        )));
    }

    let target = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: user_id,
        }))?;

    // Audit first, then mutate.
    AuditLogRepo::record_best_effort(
        &state.pool,
        &CreateAuditLog::new(
            categories::ADMIN_DELETED_USER,
            Some(admin.user_id),
            Some(target.id),
        )
        .details(format!("admin deleted {}", target.email)),
    )
    .await;

    UserRepo::soft_delete(&state.pool, target.id, Some(admin.user_id)).await?;
    SessionRepo::revoke_all_for_user(&state.pool, target.id).await?;

    Ok(Json(AdminDeleteResponse {
        message: "User deleted successfully",
        deleted_user: DeletedUserSummary {
            id: target.id,
            username: target.username,
            email: target.email,
        },
    }))
}

/// POST /account/admin/{userId}/restore
///
/// Clear the soft-delete markers on a previously deleted account.
pub async fn admin_restore_account(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<RestoreResponse>> {
    // Restore is the one flow allowed to see deleted rows.
    let target = UserRepo::find_by_id_include_deleted(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: user_id,
        }))?;

    if !target.is_deleted {
        return Err(AppError::Core(CoreError::Validation(
            "User is not deleted".into(),
        )));
    }

    UserRepo::restore(&state.pool, target.id).await?;

    AuditLogRepo::record_best_effort(
        &state.pool,
        &CreateAuditLog::new(
            categories::ADMIN_RESTORED_USER,
            Some(admin.user_id),
            Some(target.id),
        )
        .details(format!("admin restored {}", target.email)),
    )
    .await;

    Ok(Json(RestoreResponse {
        message: "User restored successfully",
        restored_user: RestoredUserSummary {
            id: target.id,
            username: target.username,
            email: target.email,
            role: target.role,
        },
    }))
}

/// GET /account/admin/deleted
///
/// All soft-deleted accounts, most recently deleted first.
pub async fn admin_list_deleted(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DeletedListResponse>> {
    let deleted_accounts = UserRepo::list_deleted(&state.pool).await?;

    Ok(Json(DeletedListResponse {
        count: deleted_accounts.len(),
        deleted_accounts,
    }))
}
