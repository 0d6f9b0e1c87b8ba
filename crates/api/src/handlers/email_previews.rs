//! Admin inspection of emails captured in preview delivery mode.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use snapbooth_events::EmailPreview;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ClearedPreviews {
    pub cleared: usize,
}

/// GET /api/v1/email/previews
///
/// Newest first. Empty when the server delivers over SMTP.
pub async fn list_previews(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<EmailPreview>>>> {
    let previews = state.previews.list().await;
    Ok(Json(DataResponse { data: previews }))
}

/// DELETE /api/v1/email/previews
pub async fn clear_previews(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<DataResponse<ClearedPreviews>>> {
    let cleared = state.previews.clear().await;
    tracing::info!(user_id = admin.user_id, cleared, "Email previews cleared");
    Ok(Json(DataResponse {
        data: ClearedPreviews { cleared },
    }))
}
