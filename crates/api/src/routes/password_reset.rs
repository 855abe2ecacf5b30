//! Route definitions for the `/password-reset` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::password_reset;
use crate::state::AppState;

/// Routes mounted at `/password-reset`.
///
/// ```text
/// POST /request          -> request_reset
/// GET  /verify/{token}   -> verify_token
/// POST /reset            -> reset_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request", post(password_reset::request_reset))
        .route("/verify/{token}", get(password_reset::verify_token))
        .route("/reset", post(password_reset::reset_password))
}
