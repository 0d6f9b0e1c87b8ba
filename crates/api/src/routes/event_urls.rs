//! Route definitions for the `/event-urls` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::event_urls;
use crate::state::AppState;

/// Routes mounted at `/event-urls`.
///
/// ```text
/// GET    /                -> list_event_urls
/// POST   /                -> create_event_url
/// GET    /{id}            -> get_event_url
/// PUT    /{id}            -> update_event_url
/// DELETE /{id}            -> deactivate_event_url
/// GET    /{id}/settings   -> list_settings_links
/// POST   /{id}/settings   -> link_settings
/// DELETE /{id}/settings   -> unlink_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(event_urls::list_event_urls).post(event_urls::create_event_url),
        )
        .route(
            "/{id}",
            get(event_urls::get_event_url)
                .put(event_urls::update_event_url)
                .delete(event_urls::deactivate_event_url),
        )
        .route(
            "/{id}/settings",
            get(event_urls::list_settings_links)
                .post(event_urls::link_settings)
                .delete(event_urls::unlink_settings),
        )
}
