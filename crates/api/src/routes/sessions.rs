//! Route definitions for the `/sessions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET  /                     -> list_sessions
/// GET  /{id}                 -> get_session
/// POST /{id}/resend-email    -> resend_email
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sessions::list_sessions))
        .route("/{id}", get(sessions::get_session))
        .route("/{id}/resend-email", post(sessions::resend_email))
}
