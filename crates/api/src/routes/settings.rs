//! Route definitions for `/settings`.

use axum::routing::get;
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/settings`.
///
/// ```text
/// GET   /?eventUrlId=  -> get_settings
/// PATCH /?eventUrlId=  -> update_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(settings::get_settings).patch(settings::update_settings),
    )
}
