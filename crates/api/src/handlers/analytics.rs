//! Handlers for `/analytics`.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use snapbooth_core::analytics::FunnelSummary;
use snapbooth_core::types::DbId;
use snapbooth_db::clamp_limit;
use snapbooth_db::models::analytics::BoothEventLog;
use snapbooth_db::repositories::AnalyticsRepo;

use crate::error::AppResult;
use crate::handlers::event_urls::load_owned_event_url;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::EventUrlScope;
use crate::response::DataResponse;
use crate::state::AppState;

/// `?eventUrlId=&limit=` for the recent events feed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEventsParams {
    pub event_url_id: Option<DbId>,
    pub limit: Option<i64>,
}

/// GET /api/v1/analytics/summary?eventUrlId=
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(scope): Query<EventUrlScope>,
) -> AppResult<Json<DataResponse<FunnelSummary>>> {
    let owner_id = scope_owner(&state, &user, scope.event_url_id).await?;
    let counts = AnalyticsRepo::funnel_counts(&state.pool, owner_id, scope.event_url_id).await?;

    Ok(Json(DataResponse {
        data: FunnelSummary::from_counts(
            counts.sessions_started,
            counts.sessions_completed,
            counts.emails_sent,
        ),
    }))
}

/// GET /api/v1/analytics/events?eventUrlId=&limit=
pub async fn recent_events(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<RecentEventsParams>,
) -> AppResult<Json<DataResponse<Vec<BoothEventLog>>>> {
    let owner_id = scope_owner(&state, &user, params.event_url_id).await?;
    let events = AnalyticsRepo::recent_events(
        &state.pool,
        owner_id,
        params.event_url_id,
        clamp_limit(params.limit),
    )
    .await?;
    Ok(Json(DataResponse { data: events }))
}

/// The tenant whose analytics are read: the event URL's owner when scoped,
/// else the caller.
async fn scope_owner(
    state: &AppState,
    user: &AuthUser,
    event_url_id: Option<DbId>,
) -> AppResult<DbId> {
    match event_url_id {
        Some(id) => Ok(load_owned_event_url(state, user, id).await?.user_id),
        None => Ok(user.user_id),
    }
}
