//! Effective settings resolution.
//!
//! Read chain for `(user_id, event_url_id?)`:
//!
//! 1. the settings row linked to the event URL by an active junction row,
//! 2. else the user's default settings row (the one flagged `is_default`,
//!    whether or not some event URL also links it),
//! 3. else nothing (or a freshly created default row via
//!    [`SettingsResolver::resolve_or_create`]).
//!
//! Callers are responsible for checking that the event URL belongs to the
//! user before asking for its settings.

use snapbooth_core::types::DbId;
use sqlx::PgPool;

use crate::models::settings::{Settings, UpdateSettings};
use crate::repositories::{EventUrlSettingsRepo, SettingsRepo};

/// Where a resolved settings row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSource {
    /// Linked to the event URL through an active junction row.
    EventUrl,
    /// The user's own default row.
    UserDefault,
    /// Created during this call because the user had no row.
    Created,
}

impl SettingsSource {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingsSource::EventUrl => "event_url",
            SettingsSource::UserDefault => "user_default",
            SettingsSource::Created => "created",
        }
    }
}

/// Resolves and writes the effective settings for a user and event URL.
pub struct SettingsResolver;

impl SettingsResolver {
    /// Resolve the effective settings row, reporting where it came from.
    pub async fn resolve_with_source(
        pool: &PgPool,
        user_id: DbId,
        event_url_id: Option<DbId>,
    ) -> Result<Option<(Settings, SettingsSource)>, sqlx::Error> {
        if let Some(event_url_id) = event_url_id {
            if let Some(link) = EventUrlSettingsRepo::find_active(pool, event_url_id).await? {
                if let Some(settings) = SettingsRepo::find_by_id(pool, link.settings_id).await? {
                    return Ok(Some((settings, SettingsSource::EventUrl)));
                }
                tracing::warn!(
                    event_url_id,
                    settings_id = link.settings_id,
                    "Active settings link points at a missing row, falling back to user default"
                );
            }
        }

        let default = SettingsRepo::find_default_for_user(pool, user_id).await?;
        Ok(default.map(|s| (s, SettingsSource::UserDefault)))
    }

    /// Resolve the effective settings row.
    ///
    /// With an `event_url_id`, returns the actively linked settings if any,
    /// else the user's default. Without one, returns the user's default or
    /// `None` when the user has no settings at all.
    pub async fn resolve(
        pool: &PgPool,
        user_id: DbId,
        event_url_id: Option<DbId>,
    ) -> Result<Option<Settings>, sqlx::Error> {
        Ok(Self::resolve_with_source(pool, user_id, event_url_id)
            .await?
            .map(|(settings, _)| settings))
    }

    /// Resolve the effective settings, creating the user's default row if
    /// nothing resolves.
    pub async fn resolve_or_create(
        pool: &PgPool,
        user_id: DbId,
        event_url_id: Option<DbId>,
    ) -> Result<(Settings, SettingsSource), sqlx::Error> {
        if let Some(found) = Self::resolve_with_source(pool, user_id, event_url_id).await? {
            return Ok(found);
        }
        Self::ensure_default(pool, user_id).await
    }

    /// The user's default row, inserting it on first use.
    async fn ensure_default(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<(Settings, SettingsSource), sqlx::Error> {
        if let Some(existing) = SettingsRepo::find_default_for_user(pool, user_id).await? {
            return Ok((existing, SettingsSource::UserDefault));
        }
        if let Some(created) = SettingsRepo::insert_default(pool, user_id).await? {
            tracing::debug!(user_id, settings_id = created.id, "Created default settings");
            return Ok((created, SettingsSource::Created));
        }
        // Lost the insert race; the winner's row is there now.
        let existing = SettingsRepo::find_default_for_user(pool, user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok((existing, SettingsSource::UserDefault))
    }

    /// Write settings for a user, optionally scoped to an event URL.
    ///
    /// - Event URL with an active link: the linked row is updated in place.
    /// - Event URL without a link: a new row owned by the user is created,
    ///   linked, and patched in one transaction. If the link fails (for
    ///   instance a concurrent writer linked first) no row is left behind.
    /// - No event URL: the user's default row is updated, or created first if
    ///   the user has none.
    pub async fn update_user_settings(
        pool: &PgPool,
        user_id: DbId,
        event_url_id: Option<DbId>,
        input: &UpdateSettings,
    ) -> Result<Settings, sqlx::Error> {
        let (updated, branch) = match event_url_id {
            Some(event_url_id) => match EventUrlSettingsRepo::find_active(pool, event_url_id).await? {
                Some(link) => (
                    SettingsRepo::update(pool, link.settings_id, input).await?,
                    "event_url_linked",
                ),
                None => (
                    Some(Self::create_linked(pool, user_id, event_url_id, input).await?),
                    "event_url_created",
                ),
            },
            None => {
                let (default, source) = Self::ensure_default(pool, user_id).await?;
                (
                    SettingsRepo::update(pool, default.id, input).await?,
                    source.as_str(),
                )
            }
        };
        let updated = updated.ok_or(sqlx::Error::RowNotFound)?;

        tracing::debug!(
            user_id,
            event_url_id,
            settings_id = updated.id,
            branch,
            "Settings written"
        );
        Ok(updated)
    }

    async fn create_linked(
        pool: &PgPool,
        user_id: DbId,
        event_url_id: DbId,
        input: &UpdateSettings,
    ) -> Result<Settings, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let created = SettingsRepo::create(&mut *tx, user_id).await?;
        EventUrlSettingsRepo::link_in(&mut tx, event_url_id, created.id).await?;
        let patched = SettingsRepo::update(&mut *tx, created.id, input)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;
        Ok(patched)
    }
}
