//! Route definitions for the `/admin` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::audit;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET /audit-logs  -> list_audit_logs (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/audit-logs", get(audit::list_audit_logs))
}
