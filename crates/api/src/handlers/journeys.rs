//! Handlers for the `/journeys` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use snapbooth_core::cache::CacheResource;
use snapbooth_core::error::CoreError;
use snapbooth_core::journey::{validate_journey_name, validate_pages};
use snapbooth_core::types::DbId;
use snapbooth_db::models::journey::{CreateJourney, Journey, JourneyResponse, UpdateJourney};
use snapbooth_db::repositories::JourneyRepo;

use crate::error::{AppError, AppResult};
use crate::invalidation::invalidate_owner_paths;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{ensure_owner, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/journeys
pub async fn list_journeys(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<JourneyResponse>>>> {
    let journeys = JourneyRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: journeys.into_iter().map(JourneyResponse::from).collect(),
    }))
}

/// POST /api/v1/journeys
pub async fn create_journey(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateJourney>,
) -> AppResult<(StatusCode, Json<DataResponse<JourneyResponse>>)> {
    validate_journey_name(&input.name)?;
    validate_pages(&input.pages)?;

    let journey = JourneyRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(
        user_id = user.user_id,
        journey_id = journey.id,
        pages = input.pages.len(),
        "Journey created"
    );
    invalidate_owner_paths(&state, CacheResource::Journeys, journey.user_id, false).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: journey.into() })))
}

/// GET /api/v1/journeys/{id}
pub async fn get_journey(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<JourneyResponse>>> {
    let journey = load_owned_journey(&state, &user, id).await?;
    Ok(Json(DataResponse { data: journey.into() }))
}

/// PUT /api/v1/journeys/{id}
///
/// Booths may be showing this journey, so the bump is urgent.
pub async fn update_journey(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateJourney>,
) -> AppResult<Json<DataResponse<JourneyResponse>>> {
    if let Some(name) = &input.name {
        validate_journey_name(name)?;
    }
    if let Some(pages) = &input.pages {
        validate_pages(pages)?;
    }
    let owner_id = load_owned_journey(&state, &user, id).await?.user_id;

    let journey = JourneyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Journey",
            id,
        }))?;
    invalidate_owner_paths(&state, CacheResource::Journeys, owner_id, true).await;

    Ok(Json(DataResponse { data: journey.into() }))
}

/// DELETE /api/v1/journeys/{id}
///
/// Settings that pointed at the journey lose their active journey.
pub async fn delete_journey(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let owner_id = load_owned_journey(&state, &user, id).await?.user_id;
    if JourneyRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = user.user_id, journey_id = id, "Journey deleted");
        invalidate_owner_paths(&state, CacheResource::Journeys, owner_id, true).await;
        invalidate_owner_paths(&state, CacheResource::Settings, owner_id, true).await;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn load_owned_journey(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Journey> {
    let journey = JourneyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Journey",
            id,
        }))?;
    ensure_owner(user, journey.user_id, "Journey", id)?;
    Ok(journey)
}
