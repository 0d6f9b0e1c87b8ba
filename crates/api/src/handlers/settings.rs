//! Handlers for `/settings`.
//!
//! Both verbs take an optional `?eventUrlId=`. With it, the event URL's
//! linked settings are read or written; without it, the caller's default
//! settings row.

use axum::extract::{Query, State};
use axum::Json;
use serde_json::Value;
use snapbooth_core::cache::CacheResource;
use snapbooth_core::error::CoreError;
use snapbooth_core::normalize::normalize_settings_patch;
use snapbooth_core::types::DbId;
use snapbooth_db::models::settings::{SettingsResponse, UpdateSettings};
use snapbooth_db::repositories::{EventUrlRepo, JourneyRepo};
use snapbooth_db::resolver::SettingsResolver;
use snapbooth_events::bus::EVENT_SETTINGS_UPDATED;
use snapbooth_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::event_urls::load_owned_event_url;
use crate::invalidation::invalidate_paths_best_effort;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::EventUrlScope;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/settings?eventUrlId=
///
/// Never 404s for a known caller: a default row is created on first read.
pub async fn get_settings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(scope): Query<EventUrlScope>,
) -> AppResult<Json<DataResponse<SettingsResponse>>> {
    let target = resolve_target(&state, &user, scope.event_url_id).await?;

    let (settings, source) =
        SettingsResolver::resolve_or_create(&state.pool, target.owner_id, scope.event_url_id)
            .await?;
    tracing::debug!(
        user_id = target.owner_id,
        event_url_id = scope.event_url_id,
        settings_id = settings.id,
        source = source.as_str(),
        "Settings resolved"
    );

    Ok(Json(DataResponse {
        data: settings.into(),
    }))
}

/// PATCH /api/v1/settings?eventUrlId=
///
/// The body is normalized before it is typed: boolean-ish values become
/// booleans and JSON-encoded list strings are decoded.
pub async fn update_settings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(scope): Query<EventUrlScope>,
    Json(body): Json<Value>,
) -> AppResult<Json<DataResponse<SettingsResponse>>> {
    let normalized = normalize_settings_patch(body)?;
    let input: UpdateSettings = serde_json::from_value(normalized)
        .map_err(|e| AppError::BadRequest(format!("Invalid settings body: {e}")))?;
    input.validate()?;

    let target = resolve_target(&state, &user, scope.event_url_id).await?;

    if let Some(journey_id) = input.active_journey_id.filter(|id| *id != 0) {
        ensure_journey_owned(&state, target.owner_id, journey_id).await?;
    }

    let settings = SettingsResolver::update_user_settings(
        &state.pool,
        target.owner_id,
        scope.event_url_id,
        &input,
    )
    .await?;

    invalidate_served_paths(&state, settings.id).await;
    state.event_bus.publish(
        PlatformEvent::new(EVENT_SETTINGS_UPDATED)
            .about("settings", settings.id)
            .for_tenant(user.user_id)
            .with_payload(serde_json::json!({
                "user_id": target.owner_id,
                "event_url_id": scope.event_url_id,
            })),
    );

    tracing::info!(
        user_id = user.user_id,
        owner_id = target.owner_id,
        settings_id = settings.id,
        "Settings updated"
    );

    Ok(Json(DataResponse {
        data: settings.into(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Whose settings a request addresses.
struct SettingsTarget {
    owner_id: DbId,
}

async fn resolve_target(
    state: &AppState,
    user: &AuthUser,
    event_url_id: Option<DbId>,
) -> AppResult<SettingsTarget> {
    match event_url_id {
        Some(id) => {
            let event_url = load_owned_event_url(state, user, id).await?;
            Ok(SettingsTarget {
                owner_id: event_url.user_id,
            })
        }
        None => Ok(SettingsTarget {
            owner_id: user.user_id,
        }),
    }
}

/// A settings row may only point at its owner's journeys.
async fn ensure_journey_owned(state: &AppState, owner_id: DbId, journey_id: DbId) -> AppResult<()> {
    match JourneyRepo::find_by_id(&state.pool, journey_id).await? {
        Some(journey) if journey.user_id == owner_id => Ok(()),
        _ => Err(AppError::Core(CoreError::Validation(format!(
            "Journey {journey_id} does not exist or belongs to another account"
        )))),
    }
}

/// Settings writes are urgent: every booth showing the written row refetches
/// now. For a default row that is each of the owner's unlinked booths, plus
/// any booth linked to it explicitly.
async fn invalidate_served_paths(state: &AppState, settings_id: DbId) {
    match EventUrlRepo::paths_served_by(&state.pool, settings_id).await {
        Ok(paths) => {
            invalidate_paths_best_effort(state, CacheResource::Settings, &paths, true).await;
        }
        Err(e) => tracing::warn!(
            settings_id,
            error = %e,
            "Could not list booth paths served by settings"
        ),
    }
}
