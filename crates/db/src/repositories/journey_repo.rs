//! Repository for the `journeys` table.

use snapbooth_core::journey::JourneyPage;
use snapbooth_core::normalize::encode_json_list;
use snapbooth_core::types::DbId;
use sqlx::PgPool;

use crate::models::journey::{CreateJourney, Journey, UpdateJourney};

const COLUMNS: &str = "id, user_id, name, pages, is_active, created_at, updated_at";

/// Provides CRUD operations for custom journeys.
pub struct JourneyRepo;

impl JourneyRepo {
    /// Insert a journey for `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateJourney,
    ) -> Result<Journey, sqlx::Error> {
        let query = format!(
            "INSERT INTO journeys (user_id, name, pages)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Journey>(&query)
            .bind(user_id)
            .bind(input.name.trim())
            .bind(encode_json_list(&input.pages))
            .fetch_one(pool)
            .await
    }

    /// Find a journey by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Journey>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM journeys WHERE id = $1");
        sqlx::query_as::<_, Journey>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's journeys, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Journey>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM journeys WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Journey>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a journey. Returns `None` if it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateJourney,
    ) -> Result<Option<Journey>, sqlx::Error> {
        let query = format!(
            "UPDATE journeys SET
                name = COALESCE($2, name),
                pages = COALESCE($3, pages),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let pages = input
            .pages
            .as_deref()
            .map(|p: &[JourneyPage]| encode_json_list(p));
        sqlx::query_as::<_, Journey>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(pages)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a journey. Settings pointing at it fall back to no journey.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM journeys WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
