//! Handlers for the `/event-urls` resource and its settings links.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use snapbooth_core::cache::{normalize_url_path, CacheResource};
use snapbooth_core::error::CoreError;
use snapbooth_core::types::DbId;
use snapbooth_db::models::event_url::{CreateEventUrl, EventUrl, UpdateEventUrl};
use snapbooth_db::models::event_url_settings::{EventUrlSettings, LinkSettings};
use snapbooth_db::repositories::{EventUrlRepo, EventUrlSettingsRepo, SettingsRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::invalidation::{invalidate_best_effort, invalidate_paths_best_effort};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{ensure_owner, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// `url_path` accepts a bare slug (`spring-gala`) or a path (`/spring-gala`).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventUrlRequest {
    pub url_path: String,
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEventUrlRequest {
    pub url_path: Option<String>,
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/event-urls
pub async fn list_event_urls(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<EventUrl>>>> {
    let urls = EventUrlRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: urls }))
}

/// POST /api/v1/event-urls
///
/// Paths are unique across tenants; a taken path is a 409.
pub async fn create_event_url(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateEventUrlRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<EventUrl>>)> {
    input.validate()?;
    let url_path = normalize_url_path(&input.url_path)?;

    let event_url = EventUrlRepo::create(
        &state.pool,
        &CreateEventUrl {
            user_id: user.user_id,
            url_path,
            name: input.name.trim().to_string(),
        },
    )
    .await?;

    tracing::info!(
        user_id = user.user_id,
        event_url_id = event_url.id,
        url_path = %event_url.url_path,
        "Event URL created"
    );
    invalidate_best_effort(&state, CacheResource::EventUrls, Some(&event_url.url_path), false)
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: event_url })))
}

/// GET /api/v1/event-urls/{id}
pub async fn get_event_url(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EventUrl>>> {
    let event_url = load_owned_event_url(&state, &user, id).await?;
    Ok(Json(DataResponse { data: event_url }))
}

/// PUT /api/v1/event-urls/{id}
///
/// Renaming the path invalidates cached settings under both the old and the
/// new path.
pub async fn update_event_url(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEventUrlRequest>,
) -> AppResult<Json<DataResponse<EventUrl>>> {
    input.validate()?;
    let existing = load_owned_event_url(&state, &user, id).await?;
    let url_path = input.url_path.as_deref().map(normalize_url_path).transpose()?;

    let updated = EventUrlRepo::update(
        &state.pool,
        id,
        &UpdateEventUrl {
            url_path,
            name: input.name.map(|n| n.trim().to_string()),
            is_active: input.is_active,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "EventUrl",
        id,
    }))?;

    let mut paths = vec![existing.url_path];
    if updated.url_path != paths[0] {
        paths.push(updated.url_path.clone());
    }
    invalidate_paths_best_effort(&state, CacheResource::EventUrls, &paths, false).await;
    invalidate_paths_best_effort(&state, CacheResource::Settings, &paths, true).await;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/event-urls/{id}
///
/// Soft-deactivate the event URL; its public booth page stops resolving.
pub async fn deactivate_event_url(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = load_owned_event_url(&state, &user, id).await?;
    if EventUrlRepo::deactivate(&state.pool, id).await? {
        tracing::info!(user_id = user.user_id, event_url_id = id, "Event URL deactivated");
        let paths = [existing.url_path];
        invalidate_paths_best_effort(&state, CacheResource::EventUrls, &paths, false).await;
        invalidate_paths_best_effort(&state, CacheResource::Settings, &paths, true).await;
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Settings links
// ---------------------------------------------------------------------------

/// GET /api/v1/event-urls/{id}/settings
///
/// Every link ever made for the event URL; at most one is active.
pub async fn list_settings_links(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<EventUrlSettings>>>> {
    load_owned_event_url(&state, &user, id).await?;
    let links = EventUrlSettingsRepo::list_for_event_url(&state.pool, id).await?;
    Ok(Json(DataResponse { data: links }))
}

/// POST /api/v1/event-urls/{id}/settings
///
/// Make an existing settings row, owned by the event URL's owner, the active
/// settings for the event URL. The previous active link is deactivated.
pub async fn link_settings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<LinkSettings>,
) -> AppResult<(StatusCode, Json<DataResponse<EventUrlSettings>>)> {
    let event_url = load_owned_event_url(&state, &user, id).await?;

    let settings = SettingsRepo::find_by_id(&state.pool, input.settings_id)
        .await?
        .filter(|s| s.user_id == event_url.user_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Settings",
            id: input.settings_id,
        }))?;

    let link = EventUrlSettingsRepo::link(&state.pool, id, settings.id).await?;
    invalidate_best_effort(&state, CacheResource::Settings, Some(&event_url.url_path), true).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: link })))
}

/// DELETE /api/v1/event-urls/{id}/settings
///
/// Drop the active link so the event URL falls back to the owner's default
/// settings.
pub async fn unlink_settings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let event_url = load_owned_event_url(&state, &user, id).await?;
    if EventUrlSettingsRepo::unlink(&state.pool, id).await? {
        invalidate_best_effort(&state, CacheResource::Settings, Some(&event_url.url_path), true)
            .await;
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load an event URL the caller owns (or any, for admins).
pub(crate) async fn load_owned_event_url(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<EventUrl> {
    let event_url = EventUrlRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "EventUrl",
            id,
        }))?;
    ensure_owner(user, event_url.user_id, "EventUrl", id)?;
    Ok(event_url)
}
