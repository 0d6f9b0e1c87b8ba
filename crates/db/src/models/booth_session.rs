//! Completed booth session model and DTOs.

use serde::{Deserialize, Serialize};
use snapbooth_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `booth_sessions` table.
///
/// Rows are created at capture completion; the only later mutation is
/// flipping `email_sent`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BoothSession {
    pub id: DbId,
    pub user_id: DbId,
    pub event_url_id: Option<DbId>,
    pub photo_path: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub email_sent: bool,
    pub started_at: Option<Timestamp>,
    pub completed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a completed session.
#[derive(Debug, Deserialize)]
pub struct CreateBoothSession {
    pub user_id: DbId,
    pub event_url_id: Option<DbId>,
    pub photo_path: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub started_at: Option<Timestamp>,
}

/// Filters for listing sessions.
#[derive(Debug, Default, Clone)]
pub struct BoothSessionFilter {
    /// Restrict to sessions owned by this user. `None` lists every tenant.
    pub user_id: Option<DbId>,
    pub event_url_id: Option<DbId>,
}
