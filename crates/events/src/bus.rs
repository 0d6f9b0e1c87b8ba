//! Booth activity bus.
//!
//! Handlers publish a [`PlatformEvent`] after every write that other parts
//! of the process care about: settings edits, completed captures, sent
//! result emails, and cache version bumps. Subscribers (the activity log,
//! one task per open `/cache/events` stream) each get their own copy.
//!
//! Delivery is best-effort. The channel keeps the newest
//! [`DEFAULT_CAPACITY`] events and a subscriber that falls further behind
//! skips ahead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snapbooth_core::types::DbId;
use tokio::sync::broadcast;

/// A cache version moved. Payload is an [`crate::InvalidationNotice`].
pub const EVENT_CACHE_INVALIDATED: &str = "cache.invalidated";

/// A tenant's settings were written.
pub const EVENT_SETTINGS_UPDATED: &str = "settings.updated";

/// A guest finished a booth capture.
pub const EVENT_BOOTH_SESSION_COMPLETED: &str = "booth.session_completed";

/// A result email was handed to the mailer.
pub const EVENT_BOOTH_EMAIL_SENT: &str = "booth.email_sent";

/// Events buffered per subscriber before the slowest one starts lagging.
pub const DEFAULT_CAPACITY: usize = 1024;

/// The row an event is about, e.g. `("booth_session", 12)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSubject {
    pub kind: String,
    pub id: DbId,
}

/// Something that happened to a tenant's booths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated name, one of the `EVENT_*` constants.
    pub name: String,
    pub subject: Option<EventSubject>,
    /// Owning tenant. Public booth traffic is attributed to the event URL's
    /// owner; resource-wide cache bumps have none.
    pub tenant_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl PlatformEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subject: None,
            tenant_id: None,
            payload: serde_json::json!({}),
            occurred_at: Utc::now(),
        }
    }

    pub fn about(mut self, kind: impl Into<String>, id: DbId) -> Self {
        self.subject = Some(EventSubject {
            kind: kind.into(),
            id,
        });
        self
    }

    pub fn for_tenant(mut self, user_id: DbId) -> Self {
        self.tenant_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

/// Fan-out hub shared as `Arc<EventBus>` in the application state.
///
/// ```rust
/// use snapbooth_events::bus::{EventBus, PlatformEvent, EVENT_SETTINGS_UPDATED};
///
/// let bus = EventBus::default();
/// let _rx = bus.subscribe();
/// assert_eq!(bus.publish(PlatformEvent::new(EVENT_SETTINGS_UPDATED)), 1);
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            sender: broadcast::channel(capacity).0,
        }
    }

    /// Send `event` to every live subscriber and return how many there were.
    /// An event nobody is listening for is dropped.
    pub fn publish(&self, event: PlatformEvent) -> usize {
        self.sender.send(event).unwrap_or_else(|unsent| {
            tracing::trace!(event = %unsent.0.name, "Event published with no subscribers");
            0
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }

    /// Live subscribers: the activity log plus open cache streams.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn capture_event_reaches_subscriber_intact() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let sent = bus.publish(
            PlatformEvent::new(EVENT_BOOTH_SESSION_COMPLETED)
                .about("booth_session", 42)
                .for_tenant(7)
                .with_payload(serde_json::json!({ "event_url_id": 3 })),
        );
        assert_eq!(sent, 1);

        let received = rx.recv().await.unwrap();
        assert!(received.is(EVENT_BOOTH_SESSION_COMPLETED));
        assert_eq!(
            received.subject,
            Some(EventSubject {
                kind: "booth_session".into(),
                id: 42
            })
        );
        assert_eq!(received.tenant_id, Some(7));
        assert_eq!(received.payload["event_url_id"], 3);
    }

    #[tokio::test]
    async fn every_open_stream_gets_its_own_copy() {
        let bus = EventBus::new(8);
        let mut log = bus.subscribe();
        let mut stream = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(PlatformEvent::new(EVENT_SETTINGS_UPDATED).for_tenant(1));

        assert!(log.recv().await.unwrap().is(EVENT_SETTINGS_UPDATED));
        assert!(stream.recv().await.unwrap().is(EVENT_SETTINGS_UPDATED));
    }

    #[tokio::test]
    async fn slow_subscriber_lags_instead_of_blocking() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for id in 0..3 {
            bus.publish(PlatformEvent::new(EVENT_CACHE_INVALIDATED).about("settings", id));
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert_eq!(rx.recv().await.unwrap().subject.map(|s| s.id), Some(1));
    }

    #[test]
    fn nobody_listening() {
        let bus = EventBus::default();
        let event = PlatformEvent::new(EVENT_BOOTH_EMAIL_SENT);
        assert!(event.subject.is_none());
        assert!(event.payload.is_object());
        assert_eq!(bus.publish(event), 0);
    }
}
