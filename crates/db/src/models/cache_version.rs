//! Monotonic cache version per resource and booth path.

use serde::Serialize;
use snapbooth_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `cache_versions` table.
///
/// An empty `url_path` is the resource-wide version.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CacheVersion {
    pub resource: String,
    pub url_path: String,
    pub version: i64,
    pub updated_at: Timestamp,
}
