//! Route definitions for the `/journeys` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::journeys;
use crate::state::AppState;

/// Routes mounted at `/journeys`.
///
/// ```text
/// GET    /      -> list_journeys
/// POST   /      -> create_journey
/// GET    /{id}  -> get_journey
/// PUT    /{id}  -> update_journey
/// DELETE /{id}  -> delete_journey
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(journeys::list_journeys).post(journeys::create_journey),
        )
        .route(
            "/{id}",
            get(journeys::get_journey)
                .put(journeys::update_journey)
                .delete(journeys::delete_journey),
        )
}
