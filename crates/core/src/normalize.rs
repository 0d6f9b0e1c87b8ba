//! Boolean and JSON-list normalization between storage and clients.
//!
//! Clients (and older imports) send boolean-like settings values in several
//! shapes: native booleans, `0`/`1` numbers, or the strings `"true"`, `"1"`,
//! `"false"`, `"0"`. Everything on [`SETTINGS_BOOLEAN_FIELDS`] is collapsed to
//! a canonical JSON boolean before it reaches the typed update DTO.
//!
//! List-valued settings are stored as JSON text. Reads go through
//! [`parse_json_list`], which never fails: a malformed column yields the
//! caller's typed default instead of an error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Allow-lists
// ---------------------------------------------------------------------------

/// Settings fields that are boolean-typed in storage.
///
/// Any field not on this list passes through normalization unchanged.
pub const SETTINGS_BOOLEAN_FIELDS: &[&str] = &[
    "filters_enabled",
    "custom_journey_enabled",
    "show_qr_code",
    "allow_retakes",
    "collect_name",
    "collect_email",
    "email_enabled",
    "smtp_secure",
];

/// Settings fields that hold a JSON-encoded list in storage.
pub const SETTINGS_JSON_LIST_FIELDS: &[&str] = &["enabled_filters"];

// ---------------------------------------------------------------------------
// Booleans
// ---------------------------------------------------------------------------

/// Collapse a boolean-like JSON value into a canonical `bool`.
///
/// `true`, `"true"`, `"1"`, and any non-zero number map to `true`.
/// Everything else (including `null`, objects, and arrays) maps to `false`.
pub fn ensure_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => s == "true" || s == "1",
        _ => false,
    }
}

/// Normalize every key in `fields` that is present in `obj` to a JSON boolean.
///
/// Explicit `null` values are left alone so that "field not provided"
/// semantics survive normalization.
pub fn normalize_boolean_fields(obj: &mut Map<String, Value>, fields: &[&str]) {
    for field in fields {
        if let Some(value) = obj.get_mut(*field) {
            if !value.is_null() {
                *value = Value::Bool(ensure_boolean(value));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// JSON lists
// ---------------------------------------------------------------------------

/// Parse a JSON-encoded list column, falling back to `default` on any failure.
///
/// A missing column, an empty string, invalid JSON, or JSON of the wrong shape
/// all yield the default.
pub fn parse_json_list<T, F>(raw: Option<&str>, default: F) -> Vec<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => serde_json::from_str(text).unwrap_or_else(|_| default()),
        _ => default(),
    }
}

/// Encode a list for storage in a JSON text column.
pub fn encode_json_list<T: Serialize>(items: &[T]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

// ---------------------------------------------------------------------------
// Settings patches
// ---------------------------------------------------------------------------

/// Normalize an incoming settings patch body.
///
/// - The body must be a JSON object.
/// - Fields on [`SETTINGS_BOOLEAN_FIELDS`] become JSON booleans.
/// - Fields on [`SETTINGS_JSON_LIST_FIELDS`] that arrive as a JSON-encoded
///   string are decoded into an array. A string that does not decode to an
///   array is a validation error.
/// - All other fields pass through unchanged.
pub fn normalize_settings_patch(body: Value) -> Result<Value, CoreError> {
    let Value::Object(mut obj) = body else {
        return Err(CoreError::Validation(
            "Settings body must be a JSON object".into(),
        ));
    };

    normalize_boolean_fields(&mut obj, SETTINGS_BOOLEAN_FIELDS);

    for field in SETTINGS_JSON_LIST_FIELDS {
        if let Some(Value::String(encoded)) = obj.get(*field) {
            let decoded: Value = serde_json::from_str(encoded).map_err(|_| {
                CoreError::Validation(format!("Field '{field}' is not a valid JSON list"))
            })?;
            if !decoded.is_array() {
                return Err(CoreError::Validation(format!(
                    "Field '{field}' must be a JSON list"
                )));
            }
            obj.insert((*field).to_string(), decoded);
        }
    }

    Ok(Value::Object(obj))
}
