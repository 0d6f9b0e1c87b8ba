//! Repository for the `event_urls` table.

use snapbooth_core::types::DbId;
use sqlx::PgPool;

use crate::models::event_url::{CreateEventUrl, EventUrl, UpdateEventUrl};

const COLUMNS: &str = "id, user_id, url_path, name, is_active, created_at, updated_at";

/// Provides CRUD operations for event URLs.
pub struct EventUrlRepo;

impl EventUrlRepo {
    /// Insert a new event URL, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateEventUrl) -> Result<EventUrl, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_urls (user_id, url_path, name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventUrl>(&query)
            .bind(input.user_id)
            .bind(&input.url_path)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find an event URL by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<EventUrl>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM event_urls WHERE id = $1");
        sqlx::query_as::<_, EventUrl>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an event URL by its canonical `/slug` path.
    pub async fn find_by_path(
        pool: &PgPool,
        url_path: &str,
    ) -> Result<Option<EventUrl>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM event_urls WHERE url_path = $1");
        sqlx::query_as::<_, EventUrl>(&query)
            .bind(url_path)
            .fetch_optional(pool)
            .await
    }

    /// List a user's event URLs, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<EventUrl>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_urls WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, EventUrl>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Paths of the owner's event URLs whose effective settings are
    /// `settings_id`: those actively linked to it and, when it is the
    /// owner's default, those with no active link.
    pub async fn paths_served_by(
        pool: &PgPool,
        settings_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT e.url_path FROM event_urls e
             JOIN settings s ON s.id = $1 AND s.user_id = e.user_id
             LEFT JOIN event_url_settings l ON l.event_url_id = e.id AND l.active
             WHERE l.settings_id = s.id OR (l.id IS NULL AND s.is_default)
             ORDER BY e.url_path",
        )
        .bind(settings_id)
        .fetch_all(pool)
        .await
    }

    /// Paths of every event URL a user owns.
    pub async fn paths_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT url_path FROM event_urls WHERE user_id = $1 ORDER BY url_path")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update an event URL. Returns `None` if it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEventUrl,
    ) -> Result<Option<EventUrl>, sqlx::Error> {
        let query = format!(
            "UPDATE event_urls SET
                url_path = COALESCE($2, url_path),
                name = COALESCE($3, name),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventUrl>(&query)
            .bind(id)
            .bind(&input.url_path)
            .bind(&input.name)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate an event URL. Returns `true` if the row changed.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE event_urls SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
