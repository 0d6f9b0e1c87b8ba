pub mod admin;
pub mod analytics;
pub mod auth;
pub mod booth;
pub mod cache;
pub mod email;
pub mod event_urls;
pub mod health;
pub mod journeys;
pub mod sessions;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Everything under `/api/v1`.
///
/// Dashboard resources need a bearer token and are scoped to the caller's
/// tenant (admins see all tenants). `/booth/{slug}/*`, `/cache/version`,
/// and `/cache/events` are public because kiosks call them without a login.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/settings", settings::router())
        .nest("/event-urls", event_urls::router())
        .nest("/journeys", journeys::router())
        .nest("/sessions", sessions::router())
        .nest("/analytics", analytics::router())
        .nest("/cache", cache::router())
        // Public booth surface, keyed by event URL slug.
        .nest("/booth", booth::router())
        .nest("/email", email::router())
}
