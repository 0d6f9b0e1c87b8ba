//! Event URL (public booth path) model and DTOs.

use serde::{Deserialize, Serialize};
use snapbooth_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `event_urls` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventUrl {
    pub id: DbId,
    pub user_id: DbId,
    pub url_path: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an event URL. `url_path` must already be canonical.
#[derive(Debug, Deserialize)]
pub struct CreateEventUrl {
    pub user_id: DbId,
    pub url_path: String,
    pub name: String,
}

/// DTO for updating an event URL.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEventUrl {
    pub url_path: Option<String>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
}
