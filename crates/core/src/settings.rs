//! Booth settings defaults and field validation.
//!
//! The default constants mirror the column defaults in the `settings`
//! migration. A freshly created row must read back with exactly these values.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_BRAND_NAME: &str = "Photo Booth";
pub const DEFAULT_PRIMARY_COLOR: &str = "#3B82F6";
pub const DEFAULT_SECONDARY_COLOR: &str = "#1E293B";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";
pub const DEFAULT_TEXT_COLOR: &str = "#111827";
pub const DEFAULT_WELCOME_MESSAGE: &str = "Welcome! Tap to start.";
pub const DEFAULT_THANK_YOU_MESSAGE: &str = "Thanks for stopping by!";
pub const DEFAULT_CAPTURE_MODE: &str = "photo";
pub const DEFAULT_COUNTDOWN_SECONDS: i32 = 3;
pub const DEFAULT_PHOTO_COUNT: i32 = 1;
pub const DEFAULT_VIDEO_DURATION_SECONDS: i32 = 10;
pub const DEFAULT_FILTERS_ENABLED: bool = true;
pub const DEFAULT_ENABLED_FILTERS: &[&str] = &["none"];
pub const DEFAULT_CUSTOM_JOURNEY_ENABLED: bool = false;
pub const DEFAULT_SHOW_QR_CODE: bool = true;
pub const DEFAULT_ALLOW_RETAKES: bool = true;
pub const DEFAULT_COLLECT_NAME: bool = true;
pub const DEFAULT_COLLECT_EMAIL: bool = true;
pub const DEFAULT_EMAIL_ENABLED: bool = false;
pub const DEFAULT_EMAIL_SUBJECT: &str = "Your photos from {brand}";
pub const DEFAULT_EMAIL_BODY: &str =
    "Hi {name},\n\nThanks for visiting {brand}! Your photo is ready: {photo_url}";
pub const DEFAULT_SMTP_PORT: i32 = 587;
pub const DEFAULT_SMTP_SECURE: bool = true;
pub const DEFAULT_STORAGE_PROVIDER: &str = "local";

/// The default filter list as owned strings.
pub fn default_enabled_filters() -> Vec<String> {
    DEFAULT_ENABLED_FILTERS.iter().map(|f| f.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Capture mode
// ---------------------------------------------------------------------------

/// How the booth captures media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    Photo,
    Video,
    Gif,
}

impl CaptureMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CaptureMode::Photo => "photo",
            CaptureMode::Video => "video",
            CaptureMode::Gif => "gif",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "photo" => Ok(CaptureMode::Photo),
            "video" => Ok(CaptureMode::Video),
            "gif" => Ok(CaptureMode::Gif),
            other => Err(CoreError::Validation(format!(
                "Invalid capture mode '{other}'. Must be one of: photo, video, gif"
            ))),
        }
    }
}

/// Validate a capture mode string.
pub fn validate_capture_mode(mode: &str) -> Result<(), CoreError> {
    CaptureMode::parse(mode).map(|_| ())
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Filters the booth client knows how to render.
pub const KNOWN_FILTERS: &[&str] = &[
    "none",
    "grayscale",
    "sepia",
    "vintage",
    "bright",
    "cool",
    "warm",
];

pub const MIN_COUNTDOWN_SECONDS: i32 = 0;
pub const MAX_COUNTDOWN_SECONDS: i32 = 10;
pub const MIN_PHOTO_COUNT: i32 = 1;
pub const MAX_PHOTO_COUNT: i32 = 6;
pub const MIN_VIDEO_DURATION_SECONDS: i32 = 3;
pub const MAX_VIDEO_DURATION_SECONDS: i32 = 60;

static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex color regex is valid")
});

/// Validate a `#RGB` or `#RRGGBB` colour. `field` names the offending field.
pub fn validate_hex_color(field: &str, value: &str) -> Result<(), CoreError> {
    if HEX_COLOR_RE.is_match(value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Field '{field}' must be a hex colour like #3B82F6, got '{value}'"
        )))
    }
}

/// Validate that every filter is known and the list has no duplicates.
pub fn validate_filters(filters: &[String]) -> Result<(), CoreError> {
    for (i, filter) in filters.iter().enumerate() {
        if !KNOWN_FILTERS.contains(&filter.as_str()) {
            return Err(CoreError::Validation(format!(
                "Unknown filter '{filter}'. Must be one of: {KNOWN_FILTERS:?}"
            )));
        }
        if filters[..i].contains(filter) {
            return Err(CoreError::Validation(format!(
                "Filter '{filter}' is listed more than once"
            )));
        }
    }
    Ok(())
}

fn validate_range(field: &str, value: i32, min: i32, max: i32) -> Result<(), CoreError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Field '{field}' must be between {min} and {max}, got {value}"
        )))
    }
}

pub fn validate_countdown(seconds: i32) -> Result<(), CoreError> {
    validate_range(
        "countdown_seconds",
        seconds,
        MIN_COUNTDOWN_SECONDS,
        MAX_COUNTDOWN_SECONDS,
    )
}

pub fn validate_photo_count(count: i32) -> Result<(), CoreError> {
    validate_range("photo_count", count, MIN_PHOTO_COUNT, MAX_PHOTO_COUNT)
}

pub fn validate_video_duration(seconds: i32) -> Result<(), CoreError> {
    validate_range(
        "video_duration_seconds",
        seconds,
        MIN_VIDEO_DURATION_SECONDS,
        MAX_VIDEO_DURATION_SECONDS,
    )
}

pub fn validate_smtp_port(port: i32) -> Result<(), CoreError> {
    validate_range("smtp_port", port, 1, 65535)
}
