//! Request handlers, one module per resource.

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod booth;
pub mod cache;
pub mod email_previews;
pub mod event_urls;
pub mod journeys;
pub mod sessions;
pub mod settings;
