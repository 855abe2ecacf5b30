//! Route definitions for the `/profile` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Routes mounted at `/profile`.
///
/// ```text
/// POST /change-password  -> change_password (session gate)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/change-password", post(profile::change_password))
}
