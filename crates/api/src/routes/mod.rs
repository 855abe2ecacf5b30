pub mod account;
pub mod admin;
pub mod auth;
pub mod health;
pub mod password_reset;
pub mod profile;

use axum::Router;

use crate::state::AppState;

/// Build the root route tree (all paths are mounted at `/`).
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                        register (public)
/// /auth/login                           login (public)
/// /auth/logout                          logout (bearer token)
/// /auth/me                              own profile (session gate)
/// /auth/users/{id}/username             change username (self or admin)
/// /auth/users/{id}/email                change email (self or admin)
///
/// /password-reset/request               issue reset token (public)
/// /password-reset/verify/{token}        probe token validity (public)
/// /password-reset/reset                 consume token (public)
///
/// /account                              self-service soft delete (DELETE)
/// /account/admin/{userId}               admin soft delete (DELETE)
/// /account/admin/{userId}/restore       admin restore (POST)
/// /account/admin/deleted                list deleted accounts (GET)
///
/// /profile/change-password              authenticated password change
///
/// /admin/audit-logs                     audit log view (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/password-reset", password_reset::router())
        .nest("/account", account::router())
        .nest("/profile", profile::router())
        .nest("/admin", admin::router())
}
