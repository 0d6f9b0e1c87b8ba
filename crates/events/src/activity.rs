//! Structured activity log fed from the event bus.
//!
//! [`ActivityLog`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! writes one tracing record per [`PlatformEvent`]. Booth activity is logged
//! at `info`, cache churn at `debug`. The task exits when the bus is dropped.

use tokio::sync::broadcast;

use crate::bus::{PlatformEvent, EVENT_CACHE_INVALIDATED};

/// Background task that logs every platform event.
pub struct ActivityLog;

impl ActivityLog {
    /// Run the logging loop until the channel closes.
    ///
    /// Returns the number of events logged.
    pub async fn run(mut receiver: broadcast::Receiver<PlatformEvent>) -> u64 {
        let mut logged = 0;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    Self::record(&event);
                    logged += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Activity log lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!(logged, "Event bus closed, activity log shutting down");
                    break;
                }
            }
        }
        logged
    }

    fn record(event: &PlatformEvent) {
        if event.is(EVENT_CACHE_INVALIDATED) {
            tracing::debug!(event = %event.name, payload = %event.payload, "Platform event");
            return;
        }
        let (kind, id) = event
            .subject
            .as_ref()
            .map(|s| (s.kind.as_str(), Some(s.id)))
            .unwrap_or(("", None));
        tracing::info!(
            event = %event.name,
            subject = kind,
            subject_id = id,
            tenant_id = event.tenant_id,
            "Platform event"
        );
    }
}
