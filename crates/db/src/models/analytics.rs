//! Append-only booth analytics and step-event models.

use serde::{Deserialize, Serialize};
use snapbooth_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `booth_analytics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BoothAnalytics {
    pub id: DbId,
    pub user_id: DbId,
    pub event_url_id: Option<DbId>,
    pub session_key: String,
    pub event_type: String,
    pub created_at: Timestamp,
}

/// A row from the `booth_event_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BoothEventLog {
    pub id: DbId,
    pub user_id: DbId,
    pub event_url_id: Option<DbId>,
    pub session_key: String,
    pub event_name: String,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for a funnel analytics record.
#[derive(Debug, Deserialize)]
pub struct CreateBoothAnalytics {
    pub user_id: DbId,
    pub event_url_id: Option<DbId>,
    pub session_key: String,
    pub event_type: String,
}

/// DTO for a granular step event.
#[derive(Debug, Deserialize)]
pub struct CreateBoothEventLog {
    pub user_id: DbId,
    pub event_url_id: Option<DbId>,
    pub session_key: String,
    pub event_name: String,
    pub metadata: serde_json::Value,
}

/// Raw funnel counts, as returned by the aggregate query.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct FunnelCounts {
    pub sessions_started: i64,
    pub sessions_completed: i64,
    pub emails_sent: i64,
}
