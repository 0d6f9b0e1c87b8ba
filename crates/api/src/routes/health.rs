//! Liveness probe, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok`, or `degraded` when Postgres does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Open cache streams plus the activity log.
    pub event_subscribers: usize,
    pub email_delivery: &'static str,
}

async fn report(State(state): State<AppState>) -> Json<HealthReport> {
    let db_healthy = match snapbooth_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health probe could not reach the database");
            false
        }
    };

    Json(HealthReport {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        event_subscribers: state.event_bus.subscriber_count(),
        email_delivery: state.config.email_delivery.as_str(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(report))
}
