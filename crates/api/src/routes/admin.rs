//! Tenant account management, `/admin/users`. Every handler takes
//! `RequireAdmin`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    let users = get(admin::list_users).post(admin::create_user);
    let user = get(admin::get_user)
        .put(admin::update_user)
        .delete(admin::deactivate_user);

    Router::new()
        .route("/users", users)
        .route("/users/{id}", user)
        .route("/users/{id}/reset-password", post(admin::reset_password))
}
