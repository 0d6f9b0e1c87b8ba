//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod analytics_repo;
pub mod auth_session_repo;
pub mod booth_session_repo;
pub mod cache_version_repo;
pub mod event_url_repo;
pub mod event_url_settings_repo;
pub mod journey_repo;
pub mod settings_repo;
pub mod user_repo;

pub use analytics_repo::AnalyticsRepo;
pub use auth_session_repo::AuthSessionRepo;
pub use booth_session_repo::BoothSessionRepo;
pub use cache_version_repo::CacheVersionRepo;
pub use event_url_repo::EventUrlRepo;
pub use event_url_settings_repo::EventUrlSettingsRepo;
pub use journey_repo::JourneyRepo;
pub use settings_repo::SettingsRepo;
pub use user_repo::UserRepo;
