//! Repository for the `booth_sessions` table.

use snapbooth_core::types::DbId;
use sqlx::PgPool;

use crate::models::booth_session::{BoothSession, BoothSessionFilter, CreateBoothSession};

const COLUMNS: &str = "id, user_id, event_url_id, photo_path, user_name, user_email, \
                       email_sent, started_at, completed_at, created_at, updated_at";

/// Provides access to completed booth sessions.
pub struct BoothSessionRepo;

impl BoothSessionRepo {
    /// Record a completed session.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBoothSession,
    ) -> Result<BoothSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO booth_sessions
                (user_id, event_url_id, photo_path, user_name, user_email, started_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BoothSession>(&query)
            .bind(input.user_id)
            .bind(input.event_url_id)
            .bind(&input.photo_path)
            .bind(&input.user_name)
            .bind(&input.user_email)
            .bind(input.started_at)
            .fetch_one(pool)
            .await
    }

    /// Find a session by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BoothSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM booth_sessions WHERE id = $1");
        sqlx::query_as::<_, BoothSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List sessions matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &BoothSessionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BoothSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM booth_sessions
             WHERE ($1::bigint IS NULL OR user_id = $1)
               AND ($2::bigint IS NULL OR event_url_id = $2)
             ORDER BY completed_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, BoothSession>(&query)
            .bind(filter.user_id)
            .bind(filter.event_url_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count sessions matching `filter`.
    pub async fn count(pool: &PgPool, filter: &BoothSessionFilter) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM booth_sessions
             WHERE ($1::bigint IS NULL OR user_id = $1)
               AND ($2::bigint IS NULL OR event_url_id = $2)",
        )
        .bind(filter.user_id)
        .bind(filter.event_url_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Flip `email_sent` to true. Returns the updated row.
    pub async fn mark_email_sent(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BoothSession>, sqlx::Error> {
        let query = format!(
            "UPDATE booth_sessions SET email_sent = true WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BoothSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
