//! Route definitions for the `/auth` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST  /register                 -> register
/// POST  /login                    -> login
/// POST  /logout                   -> logout (bearer token)
/// GET   /me                       -> me (session gate)
/// PATCH /users/{id}/username      -> change_username (self or admin)
/// PATCH /users/{id}/email         -> change_email (self or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/users/{id}/username", patch(auth::change_username))
        .route("/users/{id}/email", patch(auth::change_email))
}
