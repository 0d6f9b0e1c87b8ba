//! Custom journey pages shown to booth guests before capture.
//!
//! A journey is an ordered list of [`JourneyPage`]s stored as JSON text on
//! the `journeys` row. Pages are validated on write and sorted by `order`
//! on read.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of pages in a single journey.
pub const MAX_JOURNEY_PAGES: usize = 20;

/// Maximum length of a page title in characters.
pub const MAX_PAGE_TITLE_LENGTH: usize = 120;

/// Maximum length of a journey name in characters.
pub const MAX_JOURNEY_NAME_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What a journey page asks of the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JourneyPageKind {
    /// Static information (event details, instructions).
    Info,
    /// Collects free-form input fields.
    Form,
    /// Requires the guest to accept terms before continuing.
    Consent,
    /// Multiple-choice questions.
    Survey,
}

/// A single page in a custom journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyPage {
    pub id: String,
    pub kind: JourneyPageKind,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub required: bool,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a journey name: non-empty and within the length limit.
pub fn validate_journey_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Journey name must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_JOURNEY_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Journey name exceeds maximum length of {MAX_JOURNEY_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a page list: bounded length, non-empty ids and titles, unique ids.
pub fn validate_pages(pages: &[JourneyPage]) -> Result<(), CoreError> {
    if pages.len() > MAX_JOURNEY_PAGES {
        return Err(CoreError::Validation(format!(
            "A journey may have at most {MAX_JOURNEY_PAGES} pages (got {})",
            pages.len()
        )));
    }

    for (i, page) in pages.iter().enumerate() {
        if page.id.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Page at position {i} has an empty id"
            )));
        }
        if page.title.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Page '{}' has an empty title",
                page.id
            )));
        }
        if page.title.len() > MAX_PAGE_TITLE_LENGTH {
            return Err(CoreError::Validation(format!(
                "Page '{}' title exceeds {MAX_PAGE_TITLE_LENGTH} characters",
                page.id
            )));
        }
        if pages[..i].iter().any(|p| p.id == page.id) {
            return Err(CoreError::Validation(format!(
                "Duplicate page id '{}'",
                page.id
            )));
        }
    }

    Ok(())
}

/// Sort pages by `order`, keeping insertion order for ties.
pub fn sort_pages(pages: &mut [JourneyPage]) {
    pages.sort_by_key(|p| p.order);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: &str, order: i32) -> JourneyPage {
        JourneyPage {
            id: id.to_string(),
            kind: JourneyPageKind::Info,
            title: format!("Page {id}"),
            body: None,
            order,
            required: false,
        }
    }

    #[test]
    fn valid_pages_pass() {
        assert!(validate_pages(&[page("a", 0), page("b", 1)]).is_ok());
        assert!(validate_pages(&[]).is_ok());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = validate_pages(&[page("a", 0), page("a", 1)]).unwrap_err();
        assert!(err.to_string().contains("Duplicate page id"));
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut p = page("a", 0);
        p.title = "   ".into();
        assert!(validate_pages(&[p]).is_err());
    }

    #[test]
    fn too_many_pages_are_rejected() {
        let pages: Vec<_> = (0..=MAX_JOURNEY_PAGES as i32)
            .map(|i| page(&i.to_string(), i))
            .collect();
        assert!(validate_pages(&pages).is_err());
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let mut pages = vec![page("c", 2), page("a", 1), page("b", 1)];
        sort_pages(&mut pages);
        let ids: Vec<_> = pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn page_kind_deserializes_lowercase() {
        let p: JourneyPage =
            serde_json::from_str(r#"{"id":"x","kind":"consent","title":"Terms"}"#).unwrap();
        assert_eq!(p.kind, JourneyPageKind::Consent);
        assert!(!p.required);
        assert_eq!(p.order, 0);
    }

    #[test]
    fn journey_name_rules() {
        assert!(validate_journey_name("Wedding flow").is_ok());
        assert!(validate_journey_name("  ").is_err());
        assert!(validate_journey_name(&"x".repeat(MAX_JOURNEY_NAME_LENGTH + 1)).is_err());
    }
}
