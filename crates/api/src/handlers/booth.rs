//! Public booth endpoints (`/booth/{slug}`).
//!
//! No authentication: the slug identifies the event URL, and the event
//! URL's owner is the tenant every write is attributed to. Inactive event
//! URLs behave as if they did not exist.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use snapbooth_core::analytics::{
    validate_analytics_type, validate_event_name, validate_session_key, ANALYTICS_SESSION_COMPLETE,
};
use snapbooth_core::cache::{
    cache_buster_param, url_path_from_slug, CacheResource, NO_STORE_CACHE_CONTROL,
};
use snapbooth_core::email::validate_email_address;
use snapbooth_core::storage::validate_photo_path;
use snapbooth_core::types::{DbId, Timestamp};
use snapbooth_db::models::analytics::{
    BoothAnalytics, BoothEventLog, CreateBoothAnalytics, CreateBoothEventLog,
};
use snapbooth_db::models::booth_session::{BoothSession, CreateBoothSession};
use snapbooth_db::models::event_url::EventUrl;
use snapbooth_db::models::journey::JourneyResponse;
use snapbooth_db::models::settings::{PublicSettings, Settings};
use snapbooth_db::repositories::{
    AnalyticsRepo, BoothSessionRepo, CacheVersionRepo, EventUrlRepo, JourneyRepo,
};
use snapbooth_db::resolver::SettingsResolver;
use snapbooth_events::bus::EVENT_BOOTH_SESSION_COMPLETED;
use snapbooth_events::PlatformEvent;
use validator::Validate;

use crate::delivery::send_session_email;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// The event URL as a booth page sees it.
#[derive(Debug, Serialize)]
pub struct BoothEventUrl {
    pub id: DbId,
    pub url_path: String,
    pub name: String,
}

/// Everything a booth page needs to render.
#[derive(Debug, Serialize)]
pub struct BoothConfig {
    pub event_url: BoothEventUrl,
    pub settings: PublicSettings,
    /// The active custom journey, when enabled and present.
    pub journey: Option<JourneyResponse>,
    /// Effective settings cache version for this path.
    pub cache_version: i64,
    pub cache_buster: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = 1, max = 1024, message = "must be 1-1024 characters"))]
    pub photo_path: String,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub user_name: Option<String>,
    #[validate(length(max = 320, message = "must be at most 320 characters"))]
    pub user_email: Option<String>,
    /// Client session key; when present the funnel completion is recorded.
    pub session_key: Option<String>,
    pub started_at: Option<Timestamp>,
}

#[derive(Debug, Deserialize)]
pub struct RecordAnalyticsRequest {
    pub session_key: String,
    pub event_type: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordEventRequest {
    pub session_key: String,
    pub event_name: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/booth/{slug}
///
/// Served with no-store headers; freshness is managed through the cache
/// version instead of HTTP caching.
pub async fn get_booth(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let event_url = load_active_booth(&state, &slug).await?;
    let (settings, source) =
        SettingsResolver::resolve_or_create(&state.pool, event_url.user_id, Some(event_url.id))
            .await?;
    let journey = active_journey(&state, &settings).await?;
    let cache_version = CacheVersionRepo::current(
        &state.pool,
        CacheResource::Settings.as_str(),
        Some(&event_url.url_path),
    )
    .await?;

    tracing::debug!(
        event_url_id = event_url.id,
        settings_id = settings.id,
        source = source.as_str(),
        cache_version,
        "Booth config served"
    );

    let config = BoothConfig {
        event_url: BoothEventUrl {
            id: event_url.id,
            url_path: event_url.url_path,
            name: event_url.name,
        },
        settings: PublicSettings::from(&settings),
        journey,
        cache_version,
        cache_buster: cache_buster_param(cache_version),
    };

    Ok((
        [
            (header::CACHE_CONTROL, NO_STORE_CACHE_CONTROL),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        Json(DataResponse { data: config }),
    ))
}

/// POST /api/v1/booth/{slug}/sessions
///
/// Records a completed capture. When the booth has email enabled and the
/// guest gave an address, the result email is sent; a delivery failure is
/// logged and leaves `email_sent` false rather than failing the capture.
pub async fn create_session(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<CreateSessionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BoothSession>>)> {
    input.validate()?;
    validate_photo_path(&input.photo_path)?;
    let user_email = non_blank(input.user_email);
    if let Some(email) = user_email.as_deref() {
        validate_email_address(email)?;
    }
    if let Some(key) = input.session_key.as_deref() {
        validate_session_key(key)?;
    }

    let event_url = load_active_booth(&state, &slug).await?;
    let session = BoothSessionRepo::create(
        &state.pool,
        &CreateBoothSession {
            user_id: event_url.user_id,
            event_url_id: Some(event_url.id),
            photo_path: input.photo_path,
            user_name: non_blank(input.user_name),
            user_email,
            started_at: input.started_at,
        },
    )
    .await?;

    if let Some(session_key) = input.session_key {
        let record = CreateBoothAnalytics {
            user_id: event_url.user_id,
            event_url_id: Some(event_url.id),
            session_key,
            event_type: ANALYTICS_SESSION_COMPLETE.to_string(),
        };
        if let Err(e) = AnalyticsRepo::record(&state.pool, &record).await {
            tracing::warn!(session_id = session.id, error = %e, "Failed to record session completion");
        }
    }

    state.event_bus.publish(
        PlatformEvent::new(EVENT_BOOTH_SESSION_COMPLETED)
            .about("booth_session", session.id)
            .for_tenant(event_url.user_id)
            .with_payload(serde_json::json!({ "event_url_id": event_url.id })),
    );
    tracing::info!(
        session_id = session.id,
        event_url_id = event_url.id,
        user_id = event_url.user_id,
        "Booth session recorded"
    );

    let session = deliver_if_enabled(&state, &event_url, session).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// POST /api/v1/booth/{slug}/analytics
pub async fn record_analytics(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<RecordAnalyticsRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BoothAnalytics>>)> {
    validate_session_key(&input.session_key)?;
    validate_analytics_type(&input.event_type)?;

    let event_url = load_active_booth(&state, &slug).await?;
    let record = AnalyticsRepo::record(
        &state.pool,
        &CreateBoothAnalytics {
            user_id: event_url.user_id,
            event_url_id: Some(event_url.id),
            session_key: input.session_key,
            event_type: input.event_type,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// POST /api/v1/booth/{slug}/events
///
/// `metadata` must be a JSON object when given; it defaults to `{}`.
pub async fn record_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<RecordEventRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BoothEventLog>>)> {
    validate_session_key(&input.session_key)?;
    validate_event_name(&input.event_name)?;
    let metadata = match input.metadata {
        None | Some(serde_json::Value::Null) => serde_json::json!({}),
        Some(value @ serde_json::Value::Object(_)) => value,
        Some(_) => {
            return Err(AppError::BadRequest(
                "Field 'metadata' must be a JSON object".into(),
            ))
        }
    };

    let event_url = load_active_booth(&state, &slug).await?;
    let event = AnalyticsRepo::record_event(
        &state.pool,
        &CreateBoothEventLog {
            user_id: event_url.user_id,
            event_url_id: Some(event_url.id),
            session_key: input.session_key,
            event_name: input.event_name,
            metadata,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Look up the active event URL for a route slug.
async fn load_active_booth(state: &AppState, slug: &str) -> AppResult<EventUrl> {
    let url_path = url_path_from_slug(slug)?;
    EventUrlRepo::find_by_path(&state.pool, &url_path)
        .await?
        .filter(|event_url| event_url.is_active)
        .ok_or_else(|| AppError::NotFound(format!("No active booth at '{url_path}'")))
}

/// The journey to show, if the settings enable one and it is still active.
async fn active_journey(
    state: &AppState,
    settings: &Settings,
) -> AppResult<Option<JourneyResponse>> {
    if !settings.custom_journey_enabled {
        return Ok(None);
    }
    let Some(journey_id) = settings.active_journey_id else {
        return Ok(None);
    };
    let journey = JourneyRepo::find_by_id(&state.pool, journey_id)
        .await?
        .filter(|j| j.is_active && j.user_id == settings.user_id);
    Ok(journey.map(JourneyResponse::from))
}

/// Send the result email when the booth's settings ask for it.
async fn deliver_if_enabled(
    state: &AppState,
    event_url: &EventUrl,
    session: BoothSession,
) -> AppResult<BoothSession> {
    if session.user_email.is_none() {
        return Ok(session);
    }
    let (settings, _) =
        SettingsResolver::resolve_or_create(&state.pool, event_url.user_id, Some(event_url.id))
            .await?;
    if !settings.email_enabled {
        return Ok(session);
    }

    match send_session_email(state, &settings, &session).await {
        Ok(updated) => Ok(updated),
        Err(e) => {
            tracing::warn!(session_id = session.id, error = %e, "Result email not sent");
            Ok(session)
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
