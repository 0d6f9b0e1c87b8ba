//! Shared query parameter types for API handlers.

use serde::Deserialize;
use snapbooth_core::types::DbId;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped with `snapbooth_db::clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Optional `?eventUrlId=` scope.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUrlScope {
    pub event_url_id: Option<DbId>,
}

/// `?eventUrlId=&limit=&offset=` for scoped listings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedPagination {
    pub event_url_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
