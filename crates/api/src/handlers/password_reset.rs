//! Handlers for the `/password-reset` resource.
//!
//! Request acknowledgments are identical whether or not the email matches an
//! account, so the endpoint cannot be used to enumerate users.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{Duration, Utc};
use drivepoints_core::audit::categories;
use drivepoints_core::error::CoreError;
use drivepoints_db::models::audit::CreateAuditLog;
use drivepoints_db::repositories::{AuditLogRepo, ResetTokenRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::auth::tokens::generate_reset_token;
use crate::error::{AppError, AppResult};
use crate::handlers::auth::normalize_email;
use crate::state::AppState;

/// Generic acknowledgment sent for every reset request.
const GENERIC_ACK: &str = "If that email is registered, a reset link has been sent";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /password-reset/request`.
#[derive(Debug, Deserialize)]
pub struct RequestResetBody {
    pub email: Option<String>,
}

/// Request body for `POST /password-reset/reset`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordBody {
    pub token: Option<String>,
    pub new_password: Option<String>,
}

/// Response for `POST /password-reset/request`.
///
/// `token` and `reset_url` are only populated outside production, so
/// integration tests can complete the round trip without an email channel.
#[derive(Debug, Serialize)]
pub struct RequestResetResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "resetUrl", skip_serializing_if = "Option::is_none")]
    pub reset_url: Option<String>,
}

/// Response for `GET /password-reset/verify/{token}`.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub message: &'static str,
}

/// Response for `POST /password-reset/reset`.
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /password-reset/request
///
/// Issue a fresh reset token for the account, if one exists. The response is
/// the same either way.
pub async fn request_reset(
    State(state): State<AppState>,
    Json(input): Json<RequestResetBody>,
) -> AppResult<Json<RequestResetResponse>> {
    let email = input
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("Email is required".into())))?;
    let email = normalize_email(email);

    let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? else {
        // No row created, no hint leaked.
        return Ok(Json(RequestResetResponse {
            message: GENERIC_ACK,
            token: None,
            reset_url: None,
        }));
    };

    // Drop the user's dead tokens, then issue a fresh one.
    ResetTokenRepo::purge_stale_for_user(&state.pool, user.id).await?;

    let token = generate_reset_token();
    let expires_at = Utc::now() + Duration::minutes(state.config.reset_token_ttl_mins);
    ResetTokenRepo::create(&state.pool, user.id, &token, expires_at).await?;

    AuditLogRepo::record_best_effort(
        &state.pool,
        &CreateAuditLog::new(categories::PASSWORD_RESET_REQUEST, None, Some(user.id)),
    )
    .await;

    // Token echo is a development convenience only.
    let (token, reset_url) = if state.config.is_production() {
        (None, None)
    } else {
        let url = format!(
            "{}/reset-password?token={token}",
            state.config.reset_url_base
        );
        (Some(token), Some(url))
    };

    Ok(Json(RequestResetResponse {
        message: GENERIC_ACK,
        token,
        reset_url,
    }))
}

/// GET /password-reset/verify/{token}
///
/// Read-only probe: safe to call repeatedly, e.g. before showing the form.
pub async fn verify_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<VerifyResponse>> {
    let row = ResetTokenRepo::find_valid(&state.pool, &token).await?;
    if row.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid or expired reset token".into(),
        )));
    }

    Ok(Json(VerifyResponse {
        valid: true,
        message: "Token is valid",
    }))
}

/// POST /password-reset/reset
///
/// Consume a token and overwrite the user's password. The password write and
/// the `used` flag flip commit or roll back together.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordBody>,
) -> AppResult<Json<ResetResponse>> {
    let (token, new_password) = match (input.token, input.new_password) {
        (Some(t), Some(p)) if !t.is_empty() && !p.is_empty() => (t, p),
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Missing token or new password".into(),
            )))
        }
    };
    validate_password_strength(&new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let row = ResetTokenRepo::find_valid(&state.pool, &token)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Invalid or expired reset token".into(),
            ))
        })?;

    let password_hash = hash_password(&new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // Password overwrite and token consumption are one logical unit.
    let mut tx = state.pool.begin().await?;
    UserRepo::update_password_tx(&mut tx, row.user_id, &password_hash).await?;
    let consumed = ResetTokenRepo::mark_used_tx(&mut tx, row.id).await?;
    if !consumed {
        // Lost a race with a concurrent consumer of the same token.
        tx.rollback().await?;
        return Err(AppError::Core(CoreError::Validation(
            "Invalid or expired reset token".into(),
        )));
    }
    tx.commit().await?;

    AuditLogRepo::record_best_effort(
        &state.pool,
        &CreateAuditLog::new(
            categories::PASSWORD_RESET_COMPLETE,
            Some(row.user_id),
            Some(row.user_id),
        ),
    )
    .await;

    Ok(Json(ResetResponse {
        message: "Password has been reset successfully",
    }))
}
