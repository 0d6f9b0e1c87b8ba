//! Booth settings model and DTOs.
//!
//! The row is a flat record of branding, capture, journey, email, and storage
//! configuration. List-valued fields are JSON text in storage and are decoded
//! through [`snapbooth_core::normalize::parse_json_list`] on the way out.

use serde::{Deserialize, Serialize};
use snapbooth_core::error::CoreError;
use snapbooth_core::normalize::{encode_json_list, parse_json_list};
use snapbooth_core::settings::{
    default_enabled_filters, validate_capture_mode, validate_countdown, validate_filters,
    validate_hex_color, validate_photo_count, validate_smtp_port, validate_video_duration,
};
use snapbooth_core::storage::StorageProvider;
use snapbooth_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Maximum length of free-text settings fields (messages, subject).
pub const MAX_TEXT_FIELD_LENGTH: usize = 2_000;

/// Maximum length of the email body template.
pub const MAX_EMAIL_BODY_LENGTH: usize = 10_000;

/// A row from the `settings` table.
///
/// Contains SMTP credentials -- serialize through [`SettingsResponse`] or
/// [`PublicSettings`], never directly.
#[derive(Debug, Clone, FromRow)]
pub struct Settings {
    pub id: DbId,
    pub user_id: DbId,
    /// The owner's fallback row for event URLs without an active link.
    pub is_default: bool,
    pub brand_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub logo_url: Option<String>,
    pub background_image_url: Option<String>,
    pub welcome_message: String,
    pub thank_you_message: String,
    pub capture_mode: String,
    pub countdown_seconds: i32,
    pub photo_count: i32,
    pub video_duration_seconds: i32,
    pub filters_enabled: bool,
    pub enabled_filters: String,
    pub allow_retakes: bool,
    pub show_qr_code: bool,
    pub custom_journey_enabled: bool,
    pub active_journey_id: Option<DbId>,
    pub collect_name: bool,
    pub collect_email: bool,
    pub email_enabled: bool,
    pub email_subject: String,
    pub email_body: String,
    pub smtp_host: Option<String>,
    pub smtp_port: i32,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_secure: bool,
    pub storage_provider: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Settings {
    /// Decoded filter list; a corrupt column yields the default list.
    pub fn enabled_filters_list(&self) -> Vec<String> {
        parse_json_list(Some(self.enabled_filters.as_str()), default_enabled_filters)
    }

    /// The storage provider, falling back to local for unknown values.
    pub fn storage(&self) -> StorageProvider {
        StorageProvider::parse(&self.storage_provider).unwrap_or(StorageProvider::Local)
    }

    /// Whether this tenant has enough SMTP configuration to send mail.
    pub fn has_smtp(&self) -> bool {
        self.smtp_host.as_deref().is_some_and(|h| !h.is_empty())
    }
}

/// Owner-facing settings with normalized list fields and no SMTP password.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub is_default: bool,
    pub brand_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub logo_url: Option<String>,
    pub background_image_url: Option<String>,
    pub welcome_message: String,
    pub thank_you_message: String,
    pub capture_mode: String,
    pub countdown_seconds: i32,
    pub photo_count: i32,
    pub video_duration_seconds: i32,
    pub filters_enabled: bool,
    pub enabled_filters: Vec<String>,
    pub allow_retakes: bool,
    pub show_qr_code: bool,
    pub custom_journey_enabled: bool,
    pub active_journey_id: Option<DbId>,
    pub collect_name: bool,
    pub collect_email: bool,
    pub email_enabled: bool,
    pub email_subject: String,
    pub email_body: String,
    pub smtp_host: Option<String>,
    pub smtp_port: i32,
    pub smtp_user: Option<String>,
    /// Whether a password is stored; the password itself is never returned.
    pub has_smtp_password: bool,
    pub smtp_from: Option<String>,
    pub smtp_secure: bool,
    pub storage_provider: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Settings> for SettingsResponse {
    fn from(s: Settings) -> Self {
        let enabled_filters = s.enabled_filters_list();
        Self {
            id: s.id,
            user_id: s.user_id,
            is_default: s.is_default,
            brand_name: s.brand_name,
            primary_color: s.primary_color,
            secondary_color: s.secondary_color,
            background_color: s.background_color,
            text_color: s.text_color,
            logo_url: s.logo_url,
            background_image_url: s.background_image_url,
            welcome_message: s.welcome_message,
            thank_you_message: s.thank_you_message,
            capture_mode: s.capture_mode,
            countdown_seconds: s.countdown_seconds,
            photo_count: s.photo_count,
            video_duration_seconds: s.video_duration_seconds,
            filters_enabled: s.filters_enabled,
            enabled_filters,
            allow_retakes: s.allow_retakes,
            show_qr_code: s.show_qr_code,
            custom_journey_enabled: s.custom_journey_enabled,
            active_journey_id: s.active_journey_id,
            collect_name: s.collect_name,
            collect_email: s.collect_email,
            email_enabled: s.email_enabled,
            email_subject: s.email_subject,
            email_body: s.email_body,
            smtp_host: s.smtp_host,
            smtp_port: s.smtp_port,
            smtp_user: s.smtp_user,
            has_smtp_password: s.smtp_password.as_deref().is_some_and(|p| !p.is_empty()),
            smtp_from: s.smtp_from,
            smtp_secure: s.smtp_secure,
            storage_provider: s.storage_provider,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// The subset of settings a public booth page needs.
#[derive(Debug, Clone, Serialize)]
pub struct PublicSettings {
    pub brand_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub logo_url: Option<String>,
    pub background_image_url: Option<String>,
    pub welcome_message: String,
    pub thank_you_message: String,
    pub capture_mode: String,
    pub countdown_seconds: i32,
    pub photo_count: i32,
    pub video_duration_seconds: i32,
    pub filters_enabled: bool,
    pub enabled_filters: Vec<String>,
    pub allow_retakes: bool,
    pub show_qr_code: bool,
    pub custom_journey_enabled: bool,
    pub collect_name: bool,
    pub collect_email: bool,
    pub email_enabled: bool,
    pub updated_at: Timestamp,
}

impl From<&Settings> for PublicSettings {
    fn from(s: &Settings) -> Self {
        Self {
            brand_name: s.brand_name.clone(),
            primary_color: s.primary_color.clone(),
            secondary_color: s.secondary_color.clone(),
            background_color: s.background_color.clone(),
            text_color: s.text_color.clone(),
            logo_url: s.logo_url.clone(),
            background_image_url: s.background_image_url.clone(),
            welcome_message: s.welcome_message.clone(),
            thank_you_message: s.thank_you_message.clone(),
            capture_mode: s.capture_mode.clone(),
            countdown_seconds: s.countdown_seconds,
            photo_count: s.photo_count,
            video_duration_seconds: s.video_duration_seconds,
            filters_enabled: s.filters_enabled,
            enabled_filters: s.enabled_filters_list(),
            allow_retakes: s.allow_retakes,
            show_qr_code: s.show_qr_code,
            custom_journey_enabled: s.custom_journey_enabled,
            collect_name: s.collect_name,
            collect_email: s.collect_email,
            email_enabled: s.email_enabled,
            updated_at: s.updated_at,
        }
    }
}

/// DTO for patching settings. All fields are optional.
///
/// Nullable text fields are cleared by sending an empty string, and
/// `active_journey_id` is cleared by sending `0`. Unknown fields in the
/// request body (e.g. `id`, `created_at` echoed back by a client) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSettings {
    pub brand_name: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub logo_url: Option<String>,
    pub background_image_url: Option<String>,
    pub welcome_message: Option<String>,
    pub thank_you_message: Option<String>,
    pub capture_mode: Option<String>,
    pub countdown_seconds: Option<i32>,
    pub photo_count: Option<i32>,
    pub video_duration_seconds: Option<i32>,
    pub filters_enabled: Option<bool>,
    pub enabled_filters: Option<Vec<String>>,
    pub allow_retakes: Option<bool>,
    pub show_qr_code: Option<bool>,
    pub custom_journey_enabled: Option<bool>,
    pub active_journey_id: Option<DbId>,
    pub collect_name: Option<bool>,
    pub collect_email: Option<bool>,
    pub email_enabled: Option<bool>,
    pub email_subject: Option<String>,
    pub email_body: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<i32>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_secure: Option<bool>,
    pub storage_provider: Option<String>,
}

impl UpdateSettings {
    /// Validate every provided field against the domain rules.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.brand_name {
            if name.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Field 'brand_name' must not be empty".into(),
                ));
            }
        }

        for (field, value) in [
            ("primary_color", &self.primary_color),
            ("secondary_color", &self.secondary_color),
            ("background_color", &self.background_color),
            ("text_color", &self.text_color),
        ] {
            if let Some(color) = value {
                validate_hex_color(field, color)?;
            }
        }

        for (field, value) in [
            ("welcome_message", &self.welcome_message),
            ("thank_you_message", &self.thank_you_message),
            ("email_subject", &self.email_subject),
        ] {
            if value.as_ref().is_some_and(|v| v.len() > MAX_TEXT_FIELD_LENGTH) {
                return Err(CoreError::Validation(format!(
                    "Field '{field}' exceeds {MAX_TEXT_FIELD_LENGTH} characters"
                )));
            }
        }
        if self
            .email_body
            .as_ref()
            .is_some_and(|v| v.len() > MAX_EMAIL_BODY_LENGTH)
        {
            return Err(CoreError::Validation(format!(
                "Field 'email_body' exceeds {MAX_EMAIL_BODY_LENGTH} characters"
            )));
        }

        if let Some(mode) = &self.capture_mode {
            validate_capture_mode(mode)?;
        }
        if let Some(seconds) = self.countdown_seconds {
            validate_countdown(seconds)?;
        }
        if let Some(count) = self.photo_count {
            validate_photo_count(count)?;
        }
        if let Some(seconds) = self.video_duration_seconds {
            validate_video_duration(seconds)?;
        }
        if let Some(filters) = &self.enabled_filters {
            validate_filters(filters)?;
        }
        if let Some(port) = self.smtp_port {
            validate_smtp_port(port)?;
        }
        if let Some(provider) = &self.storage_provider {
            StorageProvider::parse(provider)?;
        }
        if self.active_journey_id.is_some_and(|id| id < 0) {
            return Err(CoreError::Validation(
                "Field 'active_journey_id' must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// The filter list in its storage encoding, if provided.
    pub fn encoded_filters(&self) -> Option<String> {
        self.enabled_filters.as_deref().map(encode_json_list)
    }
}
