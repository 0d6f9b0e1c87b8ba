//! Handlers for `/cache`: manual invalidation, version polling, and the
//! server-sent stream of urgent invalidation notices.

use std::convert::Infallible;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use snapbooth_core::cache::{cache_buster_param, normalize_url_path, CacheResource};
use snapbooth_core::error::CoreError;
use snapbooth_core::normalize::ensure_boolean;
use snapbooth_db::repositories::{CacheVersionRepo, EventUrlRepo};
use snapbooth_events::InvalidationNotice;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;

use crate::error::{AppError, AppResult};
use crate::invalidation::invalidate;
use crate::middleware::rbac::{can_access, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// SSE event name for invalidation notices.
pub const SSE_EVENT_INVALIDATE: &str = "invalidate";

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// `?resource=&urlPath=&urgent=` for manual invalidation.
///
/// `urgent` accepts the same boolean spellings as settings bodies.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidateParams {
    pub resource: String,
    pub url_path: Option<String>,
    pub urgent: Option<String>,
}

/// `?resource=&urlPath=` for version lookups.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionParams {
    pub resource: String,
    pub url_path: Option<String>,
}

/// `?urlPath=` for the notice stream.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamParams {
    pub url_path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheVersionResponse {
    pub resource: CacheResource,
    pub url_path: Option<String>,
    pub version: i64,
    /// Query fragment to append to fetches, e.g. `v=7`.
    pub cache_buster: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/cache/invalidate?resource=&urlPath=&urgent=
///
/// A path-scoped bump requires owning the event URL at that path. Without
/// `urlPath` the bump reaches every tenant's booths, so only admins may.
pub async fn invalidate_cache(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<InvalidateParams>,
) -> AppResult<Json<DataResponse<InvalidationNotice>>> {
    let resource = CacheResource::parse(&params.resource)?;
    let url_path = params
        .url_path
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(normalize_url_path)
        .transpose()?;
    let urgent = params
        .urgent
        .map(|u| ensure_boolean(&Value::String(u)))
        .unwrap_or(false);

    if let Some(path) = url_path.as_deref() {
        match EventUrlRepo::find_by_path(&state.pool, path).await? {
            Some(event_url) if can_access(&user, event_url.user_id) => {}
            Some(_) => {
                return Err(AppError::Core(CoreError::Forbidden(format!(
                    "Event URL '{path}' belongs to another account"
                ))))
            }
            None => {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "No event URL exists at '{path}'"
                ))))
            }
        }
    } else if !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only admins may invalidate every booth; pass urlPath".into(),
        )));
    }

    let notice = invalidate(&state, resource, url_path.as_deref(), urgent).await?;
    tracing::info!(
        user_id = user.user_id,
        resource = resource.as_str(),
        url_path = notice.url_path.as_deref().unwrap_or(""),
        version = notice.version,
        urgent,
        "Manual cache invalidation"
    );
    Ok(Json(DataResponse { data: notice }))
}

/// GET /api/v1/cache/version?resource=&urlPath=
///
/// Public: booth pages poll this to decide whether to refetch.
pub async fn cache_version(
    State(state): State<AppState>,
    Query(params): Query<VersionParams>,
) -> AppResult<Json<DataResponse<CacheVersionResponse>>> {
    let resource = CacheResource::parse(&params.resource)?;
    let url_path = normalize_optional_path(params.url_path.as_deref())?;

    let version =
        CacheVersionRepo::current(&state.pool, resource.as_str(), url_path.as_deref()).await?;

    Ok(Json(DataResponse {
        data: CacheVersionResponse {
            resource,
            url_path,
            version,
            cache_buster: cache_buster_param(version),
        },
    }))
}

/// GET /api/v1/cache/events?urlPath=
///
/// Streams urgent invalidation notices for `urlPath` (and resource-wide
/// ones) as `invalidate` events. Non-urgent bumps are only visible through
/// [`cache_version`]. A subscriber that falls behind skips the notices it
/// missed; its next poll catches the version up.
pub async fn cache_events(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let url_path = normalize_optional_path(params.url_path.as_deref())?;
    tracing::debug!(
        url_path = url_path.as_deref().unwrap_or(""),
        subscribers = state.event_bus.subscriber_count() + 1,
        "Cache event stream opened"
    );

    let stream = BroadcastStream::new(state.event_bus.subscribe()).filter_map(move |received| {
        let event = match received {
            Ok(event) => event,
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Cache event stream lagged");
                return None;
            }
        };
        let notice = InvalidationNotice::from_event(&event)?;
        if !notice.urgent || !notice.matches_path(url_path.as_deref()) {
            return None;
        }
        Event::default()
            .event(SSE_EVENT_INVALIDATE)
            .json_data(&notice)
            .ok()
            .map(Ok)
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn normalize_optional_path(raw: Option<&str>) -> AppResult<Option<String>> {
    Ok(raw
        .filter(|p| !p.trim().is_empty())
        .map(normalize_url_path)
        .transpose()?)
}
