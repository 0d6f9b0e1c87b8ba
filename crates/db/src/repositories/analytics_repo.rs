//! Repository for the append-only `booth_analytics` and `booth_event_logs` tables.

use snapbooth_core::analytics::{ANALYTICS_SESSION_COMPLETE, ANALYTICS_SESSION_START};
use snapbooth_core::types::DbId;
use sqlx::PgPool;

use crate::models::analytics::{
    BoothAnalytics, BoothEventLog, CreateBoothAnalytics, CreateBoothEventLog, FunnelCounts,
};

const ANALYTICS_COLUMNS: &str = "id, user_id, event_url_id, session_key, event_type, created_at";

const EVENT_LOG_COLUMNS: &str =
    "id, user_id, event_url_id, session_key, event_name, metadata, created_at";

/// Provides writes and aggregates over booth funnel data.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Append a funnel record.
    pub async fn record(
        pool: &PgPool,
        input: &CreateBoothAnalytics,
    ) -> Result<BoothAnalytics, sqlx::Error> {
        let query = format!(
            "INSERT INTO booth_analytics (user_id, event_url_id, session_key, event_type)
             VALUES ($1, $2, $3, $4)
             RETURNING {ANALYTICS_COLUMNS}"
        );
        sqlx::query_as::<_, BoothAnalytics>(&query)
            .bind(input.user_id)
            .bind(input.event_url_id)
            .bind(&input.session_key)
            .bind(&input.event_type)
            .fetch_one(pool)
            .await
    }

    /// Append a granular step event.
    pub async fn record_event(
        pool: &PgPool,
        input: &CreateBoothEventLog,
    ) -> Result<BoothEventLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO booth_event_logs (user_id, event_url_id, session_key, event_name, metadata)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {EVENT_LOG_COLUMNS}"
        );
        sqlx::query_as::<_, BoothEventLog>(&query)
            .bind(input.user_id)
            .bind(input.event_url_id)
            .bind(&input.session_key)
            .bind(&input.event_name)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Funnel counts for a user, optionally narrowed to one event URL.
    ///
    /// Starts and completions count distinct session keys so a client that
    /// reports twice is not double counted.
    pub async fn funnel_counts(
        pool: &PgPool,
        user_id: DbId,
        event_url_id: Option<DbId>,
    ) -> Result<FunnelCounts, sqlx::Error> {
        sqlx::query_as::<_, FunnelCounts>(
            "SELECT
                (SELECT COUNT(DISTINCT session_key) FROM booth_analytics
                  WHERE user_id = $1 AND ($2::bigint IS NULL OR event_url_id = $2)
                    AND event_type = $3) AS sessions_started,
                (SELECT COUNT(DISTINCT session_key) FROM booth_analytics
                  WHERE user_id = $1 AND ($2::bigint IS NULL OR event_url_id = $2)
                    AND event_type = $4) AS sessions_completed,
                (SELECT COUNT(*) FROM booth_sessions
                  WHERE user_id = $1 AND ($2::bigint IS NULL OR event_url_id = $2)
                    AND email_sent = true) AS emails_sent",
        )
        .bind(user_id)
        .bind(event_url_id)
        .bind(ANALYTICS_SESSION_START)
        .bind(ANALYTICS_SESSION_COMPLETE)
        .fetch_one(pool)
        .await
    }

    /// Most recent step events for a user, optionally narrowed to one event URL.
    pub async fn recent_events(
        pool: &PgPool,
        user_id: DbId,
        event_url_id: Option<DbId>,
        limit: i64,
    ) -> Result<Vec<BoothEventLog>, sqlx::Error> {
        let query = format!(
            "SELECT {EVENT_LOG_COLUMNS} FROM booth_event_logs
             WHERE user_id = $1 AND ($2::bigint IS NULL OR event_url_id = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, BoothEventLog>(&query)
            .bind(user_id)
            .bind(event_url_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
