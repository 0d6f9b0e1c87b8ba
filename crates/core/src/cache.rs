//! Cache-version resources and booth URL paths.
//!
//! Every cacheable resource carries a monotonic version per `(resource,
//! url_path)` pair. Clients append [`cache_buster_param`] to their fetches
//! and refetch whenever the version moves.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// `Cache-Control` value sent with public booth configuration responses.
pub const NO_STORE_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate, max-age=0";

/// Maximum length of the slug portion of an event URL path.
pub const MAX_SLUG_LENGTH: usize = 64;

static URL_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[a-z0-9][a-z0-9_-]*$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A resource whose cached copies can be invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheResource {
    #[serde(rename = "settings")]
    Settings,
    #[serde(rename = "journeys")]
    Journeys,
    #[serde(rename = "event-urls")]
    EventUrls,
}

impl CacheResource {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheResource::Settings => "settings",
            CacheResource::Journeys => "journeys",
            CacheResource::EventUrls => "event-urls",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "settings" => Ok(CacheResource::Settings),
            "journeys" => Ok(CacheResource::Journeys),
            "event-urls" => Ok(CacheResource::EventUrls),
            other => Err(CoreError::Validation(format!(
                "Unknown cache resource '{other}'. Must be one of: settings, journeys, event-urls"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// URL paths
// ---------------------------------------------------------------------------

/// Normalize a user-supplied booth path into its canonical `/slug` form.
///
/// Leading/trailing whitespace and trailing slashes are removed, a missing
/// leading slash is added, and the result is lowercased before validation.
pub fn normalize_url_path(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let slug = trimmed.trim_start_matches('/');
    let canonical = format!("/{}", slug.to_lowercase());
    validate_url_path(&canonical)?;
    Ok(canonical)
}

/// Validate a canonical `/slug` booth path.
pub fn validate_url_path(path: &str) -> Result<(), CoreError> {
    let slug_len = path.len().saturating_sub(1);
    if slug_len == 0 || slug_len > MAX_SLUG_LENGTH || !URL_PATH_RE.is_match(path) {
        return Err(CoreError::Validation(format!(
            "Invalid booth path '{path}'. Use a single segment of lowercase letters, \
             digits, '-' or '_' (max {MAX_SLUG_LENGTH} characters)"
        )));
    }
    Ok(())
}

/// Turn a route slug (no leading slash) into the stored path form.
pub fn url_path_from_slug(slug: &str) -> Result<String, CoreError> {
    normalize_url_path(slug)
}

/// Query parameter clients append to bypass stale HTTP caches.
pub fn cache_buster_param(version: i64) -> String {
    format!("v={version}")
}
