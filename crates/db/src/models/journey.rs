//! Custom journey model and DTOs.

use serde::{Deserialize, Serialize};
use snapbooth_core::journey::{sort_pages, JourneyPage};
use snapbooth_core::normalize::parse_json_list;
use snapbooth_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `journeys` table. `pages` is raw JSON text.
#[derive(Debug, Clone, FromRow)]
pub struct Journey {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub pages: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Journey {
    /// Decode the stored pages, sorted by `order`.
    ///
    /// A corrupt column decodes to an empty journey.
    pub fn parsed_pages(&self) -> Vec<JourneyPage> {
        let mut pages = parse_json_list(Some(self.pages.as_str()), Vec::new);
        sort_pages(&mut pages);
        pages
    }
}

/// Client-facing journey with decoded pages.
#[derive(Debug, Clone, Serialize)]
pub struct JourneyResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub pages: Vec<JourneyPage>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Journey> for JourneyResponse {
    fn from(journey: Journey) -> Self {
        let pages = journey.parsed_pages();
        Self {
            id: journey.id,
            user_id: journey.user_id,
            name: journey.name,
            pages,
            is_active: journey.is_active,
            created_at: journey.created_at,
            updated_at: journey.updated_at,
        }
    }
}

/// DTO for creating a journey.
#[derive(Debug, Deserialize)]
pub struct CreateJourney {
    pub name: String,
    #[serde(default)]
    pub pages: Vec<JourneyPage>,
}

/// DTO for updating a journey.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateJourney {
    pub name: Option<String>,
    pub pages: Option<Vec<JourneyPage>>,
    pub is_active: Option<bool>,
}
