//! Repository for the `cache_versions` table.

use sqlx::PgPool;

use crate::models::cache_version::CacheVersion;

const COLUMNS: &str = "resource, url_path, version, updated_at";

/// Provides monotonic per-resource cache versions.
pub struct CacheVersionRepo;

impl CacheVersionRepo {
    /// Increment the version for `(resource, url_path)`, creating it at 1.
    ///
    /// `None` bumps the resource-wide version.
    pub async fn bump(
        pool: &PgPool,
        resource: &str,
        url_path: Option<&str>,
    ) -> Result<CacheVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO cache_versions (resource, url_path, version)
             VALUES ($1, $2, 1)
             ON CONFLICT (resource, url_path)
             DO UPDATE SET version = cache_versions.version + 1, updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CacheVersion>(&query)
            .bind(resource)
            .bind(url_path.unwrap_or(""))
            .fetch_one(pool)
            .await
    }

    /// Current effective version for `(resource, url_path)`.
    ///
    /// A path-specific lookup also observes resource-wide bumps, so the
    /// result is the sum of both counters. Unknown pairs are version 0.
    pub async fn current(
        pool: &PgPool,
        resource: &str,
        url_path: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let (version,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(version), 0)::bigint FROM cache_versions
             WHERE resource = $1 AND (url_path = '' OR url_path = $2)",
        )
        .bind(resource)
        .bind(url_path.unwrap_or(""))
        .fetch_one(pool)
        .await?;
        Ok(version)
    }
}
