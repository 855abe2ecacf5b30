//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`SessionUser`] and rejects requests whose role does
//! not match. The session gate runs first, so a revoked session fails 401
//! before any role check. Role mismatches fail 403 without leaking whether
//! the guarded resource exists.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use drivepoints_core::error::CoreError;
use drivepoints_db::models::user::Role;

use super::session::SessionUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the ADMIN role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub SessionUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = SessionUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires the SPONSOR role. Rejects with 403 Forbidden otherwise.
///
/// Used by sponsor roster routes layered on this core.
pub struct RequireSponsor(pub SessionUser);

impl FromRequestParts<AppState> for RequireSponsor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = SessionUser::from_request_parts(parts, state).await?;
        if user.role != Role::Sponsor {
            return Err(AppError::Core(CoreError::Forbidden(
                "Sponsor role required".into(),
            )));
        }
        Ok(RequireSponsor(user))
    }
}

/// Requires the DRIVER role. Rejects with 403 Forbidden otherwise.
///
/// Used by driver points routes layered on this core.
pub struct RequireDriver(pub SessionUser);

impl FromRequestParts<AppState> for RequireDriver {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = SessionUser::from_request_parts(parts, state).await?;
        if user.role != Role::Driver {
            return Err(AppError::Core(CoreError::Forbidden(
                "Driver role required".into(),
            )));
        }
        Ok(RequireDriver(user))
    }
}
