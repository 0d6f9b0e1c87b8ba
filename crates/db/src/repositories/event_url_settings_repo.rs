//! Repository for the `event_url_settings` junction table.
//!
//! At most one row per event URL may be active. [`EventUrlSettingsRepo::link`]
//! deactivates the current link and inserts the new one in a single
//! transaction, and the partial unique index `uq_event_url_settings_active`
//! rejects any concurrent writer that slips past.

use snapbooth_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::event_url_settings::EventUrlSettings;

const COLUMNS: &str = "id, event_url_id, settings_id, active, created_at, updated_at";

/// Provides data access for event URL to settings links.
pub struct EventUrlSettingsRepo;

impl EventUrlSettingsRepo {
    /// Find the active link for an event URL, if any.
    pub async fn find_active(
        pool: &PgPool,
        event_url_id: DbId,
    ) -> Result<Option<EventUrlSettings>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_url_settings
             WHERE event_url_id = $1 AND active = true
             ORDER BY id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, EventUrlSettings>(&query)
            .bind(event_url_id)
            .fetch_optional(pool)
            .await
    }

    /// List every link (active and historical) for an event URL, newest first.
    pub async fn list_for_event_url(
        pool: &PgPool,
        event_url_id: DbId,
    ) -> Result<Vec<EventUrlSettings>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_url_settings
             WHERE event_url_id = $1
             ORDER BY id DESC"
        );
        sqlx::query_as::<_, EventUrlSettings>(&query)
            .bind(event_url_id)
            .fetch_all(pool)
            .await
    }

    /// Make `settings_id` the active settings for `event_url_id`.
    ///
    /// Any previously active link for the event URL is deactivated first.
    pub async fn link(
        pool: &PgPool,
        event_url_id: DbId,
        settings_id: DbId,
    ) -> Result<EventUrlSettings, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let link = Self::link_in(&mut tx, event_url_id, settings_id).await?;
        tx.commit().await?;
        Ok(link)
    }

    /// [`Self::link`] inside a caller's transaction, so a row created for
    /// the link is rolled back with it.
    pub async fn link_in(
        tx: &mut Transaction<'_, Postgres>,
        event_url_id: DbId,
        settings_id: DbId,
    ) -> Result<EventUrlSettings, sqlx::Error> {
        let deactivated = sqlx::query(
            "UPDATE event_url_settings SET active = false
             WHERE event_url_id = $1 AND active = true",
        )
        .bind(event_url_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        let query = format!(
            "INSERT INTO event_url_settings (event_url_id, settings_id, active)
             VALUES ($1, $2, true)
             RETURNING {COLUMNS}"
        );
        let link = sqlx::query_as::<_, EventUrlSettings>(&query)
            .bind(event_url_id)
            .bind(settings_id)
            .fetch_one(&mut **tx)
            .await?;

        tracing::debug!(
            event_url_id,
            settings_id,
            deactivated,
            link_id = link.id,
            "Linked settings to event URL"
        );
        Ok(link)
    }

    /// Deactivate the active link for an event URL, reverting it to the
    /// owner's default settings. Returns `true` if a link was deactivated.
    pub async fn unlink(pool: &PgPool, event_url_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE event_url_settings SET active = false
             WHERE event_url_id = $1 AND active = true",
        )
        .bind(event_url_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
