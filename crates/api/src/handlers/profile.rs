//! Handlers for the `/profile` resource (authenticated password change).

use axum::extract::State;
use axum::Json;
use drivepoints_core::audit::categories;
use drivepoints_core::error::CoreError;
use drivepoints_db::models::audit::CreateAuditLog;
use drivepoints_db::repositories::{AuditLogRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionUser;
use crate::state::AppState;

/// Request body for `POST /profile/change-password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Response for `POST /profile/change-password`.
#[derive(Debug, Serialize)]
pub struct ChangePasswordResponse {
    pub message: &'static str,
}

/// POST /profile/change-password
///
/// The caller must prove knowledge of the current password before the new
/// one is accepted.
pub async fn change_password(
    State(state): State<AppState>,
    user: SessionUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<ChangePasswordResponse>> {
    let (current, new) = match (input.current_password, input.new_password) {
        (Some(c), Some(n)) if !c.is_empty() && !n.is_empty() => (c, n),
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Missing current or new password".into(),
            )))
        }
    };
    validate_password_strength(&new).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: user.user_id,
        }))?;

    let current_valid = verify_password(&current, &row.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    let password_hash = hash_password(&new)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, row.id, &password_hash).await?;

    AuditLogRepo::record_best_effort(
        &state.pool,
        &CreateAuditLog::new(categories::PASSWORD_CHANGE, Some(row.id), Some(row.id)),
    )
    .await;

    Ok(Json(ChangePasswordResponse {
        message: "Password changed successfully",
    }))
}
