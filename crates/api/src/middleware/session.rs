//! The stateful session gate.
//!
//! Every protected route extracts [`SessionUser`], which re-validates the
//! bearer token AND cross-checks its `jti` against the session ledger on
//! every single request. There is no cross-request caching: a revocation
//! (logout, eviction, admin delete) takes effect on the very next request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use drivepoints_core::error::CoreError;
use drivepoints_core::types::DbId;
use drivepoints_db::models::user::Role;
use drivepoints_db::repositories::SessionRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated principal extracted from a bearer token with a live session.
///
/// Use this as an extractor parameter in any handler that requires an active
/// session:
///
/// ```ignore
/// async fn my_handler(user: SessionUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// The user's internal database id.
    pub user_id: DbId,
    /// The user's role from the verified token.
    pub role: Role,
    /// The user's sponsor affiliation, if any.
    pub sponsor_id: Option<DbId>,
    /// The session identifier backing this request.
    pub jti: String,
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // 1. Bearer token must be present.
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("missing token".into())))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("missing token".into())))?;

        // 2. Signature and expiry must verify.
        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| AppError::Core(CoreError::Unauthorized("invalid token".into())))?;

        // 3. The payload must carry a session id.
        let jti = claims
            .jti
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("missing session id".into())))?;

        // 4. The ledger must hold a live row for (user, jti).
        SessionRepo::find_active(&state.pool, claims.id, &jti)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("session revoked".into())))?;

        // 5. Expose the principal.
        Ok(SessionUser {
            user_id: claims.id,
            role: claims.role,
            sponsor_id: claims.sponsor_id,
            jti,
        })
    }
}
