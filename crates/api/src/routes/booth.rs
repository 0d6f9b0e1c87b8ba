//! Route definitions for the public `/booth` surface.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::booth;
use crate::state::AppState;

/// Routes mounted at `/booth`. None require authentication.
///
/// ```text
/// GET  /{slug}            -> get_booth
/// POST /{slug}/sessions   -> create_session
/// POST /{slug}/analytics  -> record_analytics
/// POST /{slug}/events     -> record_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{slug}", get(booth::get_booth))
        .route("/{slug}/sessions", post(booth::create_session))
        .route("/{slug}/analytics", post(booth::record_analytics))
        .route("/{slug}/events", post(booth::record_event))
}
