//! Handlers for the admin audit log view.

use axum::extract::{Query, State};
use axum::Json;
use drivepoints_db::models::audit::{AuditLogPage, AuditQuery};
use drivepoints_db::repositories::AuditLogRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /admin/audit-logs
///
/// Filterable by `category`, `actor_user_id`, `target_user_id`; paginated
/// via `limit` (capped at 500) and `offset`. Newest entries first.
pub async fn list_audit_logs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AuditQuery>,
) -> AppResult<Json<AuditLogPage>> {
    let items = AuditLogRepo::query(&state.pool, &params).await?;
    let total = AuditLogRepo::count(&state.pool, &params).await?;

    Ok(Json(AuditLogPage { items, total }))
}
