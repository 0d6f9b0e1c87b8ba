//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod analytics;
pub mod auth_session;
pub mod booth_session;
pub mod cache_version;
pub mod event_url;
pub mod event_url_settings;
pub mod journey;
pub mod settings;
pub mod user;
