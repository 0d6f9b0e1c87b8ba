//! Cache version bumps and the notices they publish.

use snapbooth_core::cache::{normalize_url_path, CacheResource};
use snapbooth_core::types::DbId;
use snapbooth_db::repositories::{CacheVersionRepo, EventUrlRepo};
use snapbooth_events::InvalidationNotice;

use crate::error::AppResult;
use crate::state::AppState;

/// Bump the cache version for `(resource, url_path)` and publish the notice.
///
/// `url_path` may be a bare slug or a `/slug` path; `None` bumps the
/// resource-wide version that every path observes. The returned notice
/// carries the effective version for the path.
pub async fn invalidate(
    state: &AppState,
    resource: CacheResource,
    url_path: Option<&str>,
    urgent: bool,
) -> AppResult<InvalidationNotice> {
    let url_path = url_path.map(normalize_url_path).transpose()?;

    CacheVersionRepo::bump(&state.pool, resource.as_str(), url_path.as_deref()).await?;
    let version =
        CacheVersionRepo::current(&state.pool, resource.as_str(), url_path.as_deref()).await?;

    let notice = InvalidationNotice {
        resource,
        url_path,
        version,
        urgent,
    };
    let receivers = state.event_bus.publish(notice.to_event());

    tracing::debug!(
        resource = resource.as_str(),
        url_path = notice.url_path.as_deref().unwrap_or(""),
        version,
        urgent,
        receivers,
        "Cache invalidated"
    );
    Ok(notice)
}

/// [`invalidate`] for callers whose own write already succeeded: a failed
/// bump is logged, not returned.
pub async fn invalidate_best_effort(
    state: &AppState,
    resource: CacheResource,
    url_path: Option<&str>,
    urgent: bool,
) -> Option<InvalidationNotice> {
    match invalidate(state, resource, url_path, urgent).await {
        Ok(notice) => Some(notice),
        Err(e) => {
            tracing::warn!(
                resource = resource.as_str(),
                url_path = url_path.unwrap_or(""),
                error = %e,
                "Cache invalidation failed"
            );
            None
        }
    }
}

/// [`invalidate_best_effort`] for each booth path. Returns how many bumps
/// succeeded.
pub async fn invalidate_paths_best_effort(
    state: &AppState,
    resource: CacheResource,
    paths: &[String],
    urgent: bool,
) -> usize {
    let mut bumped = 0;
    for path in paths {
        if invalidate_best_effort(state, resource, Some(path), urgent).await.is_some() {
            bumped += 1;
        }
    }
    bumped
}

/// Bump `resource` on every booth path `owner_id` has. Other tenants'
/// booths keep their versions.
pub async fn invalidate_owner_paths(
    state: &AppState,
    resource: CacheResource,
    owner_id: DbId,
    urgent: bool,
) -> usize {
    match EventUrlRepo::paths_for_user(&state.pool, owner_id).await {
        Ok(paths) => invalidate_paths_best_effort(state, resource, &paths, urgent).await,
        Err(e) => {
            tracing::warn!(
                resource = resource.as_str(),
                owner_id,
                error = %e,
                "Could not list booth paths to invalidate"
            );
            0
        }
    }
}
