//! Cache invalidation notices carried on the event bus.

use serde::{Deserialize, Serialize};
use snapbooth_core::cache::CacheResource;

use crate::bus::{PlatformEvent, EVENT_CACHE_INVALIDATED};

/// A cache version bump that open booth clients may want to react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidationNotice {
    pub resource: CacheResource,
    /// Normalized `/slug` path, or `None` for a resource-wide bump.
    pub url_path: Option<String>,
    /// The effective version after the bump.
    pub version: i64,
    /// Urgent notices ask clients to refetch immediately instead of on
    /// their next poll.
    pub urgent: bool,
}

impl InvalidationNotice {
    /// Wrap the notice in a `cache.invalidated` event.
    pub fn to_event(&self) -> PlatformEvent {
        let payload = serde_json::to_value(self).unwrap_or_default();
        PlatformEvent::new(EVENT_CACHE_INVALIDATED).with_payload(payload)
    }

    /// Extract a notice from an event, if it is a `cache.invalidated` event
    /// with a well-formed payload.
    pub fn from_event(event: &PlatformEvent) -> Option<Self> {
        if !event.is(EVENT_CACHE_INVALIDATED) {
            return None;
        }
        serde_json::from_value(event.payload.clone()).ok()
    }

    /// Whether a subscriber watching `path` should see this notice.
    ///
    /// Resource-wide notices reach everyone, and a subscriber without a path
    /// sees every notice.
    pub fn matches_path(&self, path: Option<&str>) -> bool {
        match (self.url_path.as_deref(), path) {
            (None, _) | (_, None) => true,
            (Some(own), Some(wanted)) => own == wanted,
        }
    }
}
