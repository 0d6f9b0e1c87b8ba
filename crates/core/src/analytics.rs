//! Booth funnel analytics: event names and summary computation.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

pub const ANALYTICS_SESSION_START: &str = "session_start";
pub const ANALYTICS_SESSION_COMPLETE: &str = "session_complete";

const VALID_ANALYTICS_TYPES: &[&str] = &[ANALYTICS_SESSION_START, ANALYTICS_SESSION_COMPLETE];

/// Maximum length of a granular step event name.
pub const MAX_EVENT_NAME_LENGTH: usize = 64;

/// Maximum length of a client-generated session key.
pub const MAX_SESSION_KEY_LENGTH: usize = 128;

static EVENT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_.]*$").expect("valid regex"));

/// Validate a funnel analytics type (`session_start` / `session_complete`).
pub fn validate_analytics_type(event_type: &str) -> Result<(), CoreError> {
    if VALID_ANALYTICS_TYPES.contains(&event_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid analytics type '{event_type}'. Must be one of: {VALID_ANALYTICS_TYPES:?}"
        )))
    }
}

/// Validate a step event name such as `journey.page_viewed`.
pub fn validate_event_name(name: &str) -> Result<(), CoreError> {
    if name.len() > MAX_EVENT_NAME_LENGTH || !EVENT_NAME_RE.is_match(name) {
        return Err(CoreError::Validation(format!(
            "Invalid event name '{name}'. Use lowercase letters, digits, '_' or '.' \
             (max {MAX_EVENT_NAME_LENGTH} characters)"
        )));
    }
    Ok(())
}

/// Validate a client-generated session key.
pub fn validate_session_key(key: &str) -> Result<(), CoreError> {
    if key.trim().is_empty() || key.len() > MAX_SESSION_KEY_LENGTH {
        return Err(CoreError::Validation(format!(
            "Session key must be 1-{MAX_SESSION_KEY_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Funnel totals for one booth (or all of a customer's booths).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelSummary {
    pub sessions_started: i64,
    pub sessions_completed: i64,
    pub emails_sent: i64,
    /// `sessions_completed / sessions_started`, or `0.0` when nothing started.
    pub completion_rate: f64,
}

impl FunnelSummary {
    pub fn from_counts(sessions_started: i64, sessions_completed: i64, emails_sent: i64) -> Self {
        let completion_rate = if sessions_started > 0 {
            sessions_completed as f64 / sessions_started as f64
        } else {
            0.0
        };
        Self {
            sessions_started,
            sessions_completed,
            emails_sent,
            completion_rate,
        }
    }
}
