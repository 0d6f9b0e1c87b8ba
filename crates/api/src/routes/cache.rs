//! Route definitions for `/cache`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::cache;
use crate::state::AppState;

/// Routes mounted at `/cache`.
///
/// ```text
/// POST /invalidate  -> invalidate_cache (requires auth)
/// GET  /version     -> cache_version
/// GET  /events      -> cache_events (SSE)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/invalidate", post(cache::invalidate_cache))
        .route("/version", get(cache::cache_version))
        .route("/events", get(cache::cache_events))
}
