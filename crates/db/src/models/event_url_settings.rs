//! Junction between an event URL and the settings row it uses.

use serde::{Deserialize, Serialize};
use snapbooth_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `event_url_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventUrlSettings {
    pub id: DbId,
    pub event_url_id: DbId,
    pub settings_id: DbId,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for linking a settings row to an event URL.
#[derive(Debug, Deserialize)]
pub struct LinkSettings {
    pub settings_id: DbId,
}
