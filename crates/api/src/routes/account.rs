//! Route definitions for the `/account` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// Routes mounted at `/account`.
///
/// ```text
/// DELETE /                          -> delete_account (session gate)
/// DELETE /admin/{userId}            -> admin_delete_account (admin only)
/// POST   /admin/{userId}/restore    -> admin_restore_account (admin only)
/// GET    /admin/deleted             -> admin_list_deleted (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", delete(account::delete_account))
        .route("/admin/deleted", get(account::admin_list_deleted))
        .route("/admin/{user_id}", delete(account::admin_delete_account))
        .route(
            "/admin/{user_id}/restore",
            post(account::admin_restore_account),
        )
}
