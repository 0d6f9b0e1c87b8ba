//! Handlers for completed booth sessions (`/sessions`).

use axum::extract::{Path, Query, State};
use axum::Json;
use snapbooth_core::error::CoreError;
use snapbooth_core::types::DbId;
use snapbooth_db::models::booth_session::{BoothSession, BoothSessionFilter};
use snapbooth_db::repositories::BoothSessionRepo;
use snapbooth_db::resolver::SettingsResolver;
use snapbooth_db::{clamp_limit, clamp_offset};

use crate::delivery::send_session_email;
use crate::error::{AppError, AppResult};
use crate::handlers::event_urls::load_owned_event_url;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{ensure_owner, RequireAuth};
use crate::query::ScopedPagination;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// GET /api/v1/sessions?eventUrlId=&limit=&offset=
///
/// Customers see their own sessions. Admins see every tenant's sessions
/// unless they narrow the listing to one event URL.
pub async fn list_sessions(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ScopedPagination>,
) -> AppResult<Json<PagedResponse<BoothSession>>> {
    if let Some(event_url_id) = params.event_url_id {
        load_owned_event_url(&state, &user, event_url_id).await?;
    }

    let filter = BoothSessionFilter {
        user_id: (!user.is_admin()).then_some(user.user_id),
        event_url_id: params.event_url_id,
    };
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let sessions = BoothSessionRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = BoothSessionRepo::count(&state.pool, &filter).await?;

    Ok(Json(PagedResponse::new(sessions, total, limit, offset)))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BoothSession>>> {
    let session = load_owned_session(&state, &user, id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/sessions/{id}/resend-email
///
/// Uses the settings the session's booth resolves to now, not at capture
/// time. Delivery failures surface as 502.
pub async fn resend_email(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BoothSession>>> {
    let session = load_owned_session(&state, &user, id).await?;
    let (settings, _) =
        SettingsResolver::resolve_or_create(&state.pool, session.user_id, session.event_url_id)
            .await?;

    let updated = send_session_email(&state, &settings, &session).await?;
    tracing::info!(
        user_id = user.user_id,
        session_id = id,
        mailer = state.mailer.kind(),
        "Session email resent"
    );
    Ok(Json(DataResponse { data: updated }))
}

async fn load_owned_session(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<BoothSession> {
    let session = BoothSessionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BoothSession",
            id,
        }))?;
    ensure_owner(user, session.user_id, "BoothSession", id)?;
    Ok(session)
}
