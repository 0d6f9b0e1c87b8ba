//! Route definitions for `/email`.

use axum::routing::get;
use axum::Router;

use crate::handlers::email_previews;
use crate::state::AppState;

/// Routes mounted at `/email` (admin only).
///
/// ```text
/// GET    /previews  -> list_previews
/// DELETE /previews  -> clear_previews
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/previews",
        get(email_previews::list_previews).delete(email_previews::clear_previews),
    )
}
