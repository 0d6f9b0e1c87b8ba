//! Repository for the `settings` table.
//!
//! Rows are created lazily with column defaults and never hard-deleted.
//! Each user has at most one row flagged `is_default`; every other row
//! exists to be linked to event URLs. Resolution lives in
//! [`crate::resolver`].

use snapbooth_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::settings::{Settings, UpdateSettings};

/// Column list for the `settings` table.
const COLUMNS: &str = "id, user_id, is_default, brand_name, primary_color, secondary_color, \
    background_color, text_color, logo_url, background_image_url, welcome_message, \
    thank_you_message, capture_mode, countdown_seconds, photo_count, video_duration_seconds, \
    filters_enabled, enabled_filters, allow_retakes, show_qr_code, custom_journey_enabled, \
    active_journey_id, collect_name, collect_email, email_enabled, email_subject, email_body, \
    smtp_host, smtp_port, smtp_user, smtp_password, smtp_from, smtp_secure, storage_provider, \
    created_at, updated_at";

/// Provides data access for booth settings rows.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Insert a non-default row populated from column defaults.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<Settings, sqlx::Error> {
        let query = format!("INSERT INTO settings (user_id) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Settings>(&query)
            .bind(user_id)
            .fetch_one(executor)
            .await
    }

    /// Insert the user's default row from column defaults.
    ///
    /// Returns `None` when the user already has a default, including one
    /// inserted concurrently; `uq_settings_user_default` arbitrates.
    pub async fn insert_default(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Settings>, sqlx::Error> {
        let query = format!(
            "INSERT INTO settings (user_id, is_default) VALUES ($1, true)
             ON CONFLICT (user_id) WHERE is_default DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Settings>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a settings row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Settings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM settings WHERE id = $1");
        sqlx::query_as::<_, Settings>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the user's default settings row. Linking it to an event URL
    /// does not change which row this is.
    pub async fn find_default_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Settings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM settings WHERE user_id = $1 AND is_default");
        sqlx::query_as::<_, Settings>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List every settings row a user owns, oldest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Settings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM settings WHERE user_id = $1 ORDER BY id");
        sqlx::query_as::<_, Settings>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a patch to a settings row. Only non-`None` fields are written.
    ///
    /// Nullable text columns are cleared by an empty string and
    /// `active_journey_id` by `0`. Returns `None` if the row does not exist.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateSettings,
    ) -> Result<Option<Settings>, sqlx::Error> {
        let query = format!(
            "UPDATE settings SET
                brand_name = COALESCE($2, brand_name),
                primary_color = COALESCE($3, primary_color),
                secondary_color = COALESCE($4, secondary_color),
                background_color = COALESCE($5, background_color),
                text_color = COALESCE($6, text_color),
                logo_url = CASE WHEN $7::text IS NULL THEN logo_url ELSE NULLIF($7, '') END,
                background_image_url = CASE WHEN $8::text IS NULL THEN background_image_url
                                            ELSE NULLIF($8, '') END,
                welcome_message = COALESCE($9, welcome_message),
                thank_you_message = COALESCE($10, thank_you_message),
                capture_mode = COALESCE($11, capture_mode),
                countdown_seconds = COALESCE($12, countdown_seconds),
                photo_count = COALESCE($13, photo_count),
                video_duration_seconds = COALESCE($14, video_duration_seconds),
                filters_enabled = COALESCE($15, filters_enabled),
                enabled_filters = COALESCE($16, enabled_filters),
                allow_retakes = COALESCE($17, allow_retakes),
                show_qr_code = COALESCE($18, show_qr_code),
                custom_journey_enabled = COALESCE($19, custom_journey_enabled),
                active_journey_id = CASE WHEN $20::bigint IS NULL THEN active_journey_id
                                         ELSE NULLIF($20, 0) END,
                collect_name = COALESCE($21, collect_name),
                collect_email = COALESCE($22, collect_email),
                email_enabled = COALESCE($23, email_enabled),
                email_subject = COALESCE($24, email_subject),
                email_body = COALESCE($25, email_body),
                smtp_host = CASE WHEN $26::text IS NULL THEN smtp_host ELSE NULLIF($26, '') END,
                smtp_port = COALESCE($27, smtp_port),
                smtp_user = CASE WHEN $28::text IS NULL THEN smtp_user ELSE NULLIF($28, '') END,
                smtp_password = CASE WHEN $29::text IS NULL THEN smtp_password
                                     ELSE NULLIF($29, '') END,
                smtp_from = CASE WHEN $30::text IS NULL THEN smtp_from ELSE NULLIF($30, '') END,
                smtp_secure = COALESCE($31, smtp_secure),
                storage_provider = COALESCE($32, storage_provider)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Settings>(&query)
            .bind(id)
            .bind(&input.brand_name)
            .bind(&input.primary_color)
            .bind(&input.secondary_color)
            .bind(&input.background_color)
            .bind(&input.text_color)
            .bind(&input.logo_url)
            .bind(&input.background_image_url)
            .bind(&input.welcome_message)
            .bind(&input.thank_you_message)
            .bind(&input.capture_mode)
            .bind(input.countdown_seconds)
            .bind(input.photo_count)
            .bind(input.video_duration_seconds)
            .bind(input.filters_enabled)
            .bind(input.encoded_filters())
            .bind(input.allow_retakes)
            .bind(input.show_qr_code)
            .bind(input.custom_journey_enabled)
            .bind(input.active_journey_id)
            .bind(input.collect_name)
            .bind(input.collect_email)
            .bind(input.email_enabled)
            .bind(&input.email_subject)
            .bind(&input.email_body)
            .bind(&input.smtp_host)
            .bind(input.smtp_port)
            .bind(&input.smtp_user)
            .bind(&input.smtp_password)
            .bind(&input.smtp_from)
            .bind(input.smtp_secure)
            .bind(&input.storage_provider)
            .fetch_optional(executor)
            .await
    }
}
