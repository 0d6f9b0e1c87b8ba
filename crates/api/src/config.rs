use snapbooth_core::storage::{public_photo_url, StorageProvider};
use snapbooth_events::EmailDeliveryMode;

use crate::auth::jwt::JwtConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Process-wide settings, read once at startup. Per-tenant booth settings
/// live in the database, not here.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Dashboard origins allowed by CORS.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// `preview` captures result emails in memory, `smtp` sends them.
    pub email_delivery: EmailDeliveryMode,
    pub storage: StorageConfig,
    /// Admin account to create at startup if no admin exists yet.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `EMAIL_DELIVERY`       | `preview`                  |
    ///
    /// JWT, storage, and bootstrap-admin variables are read by their own
    /// `from_env`.
    ///
    /// # Panics
    ///
    /// On any malformed value.
    pub fn from_env() -> Self {
        let email_delivery = std::env::var("EMAIL_DELIVERY")
            .map(|raw| {
                EmailDeliveryMode::parse(&raw).unwrap_or_else(|| {
                    panic!("EMAIL_DELIVERY must be 'preview' or 'smtp', got '{raw}'")
                })
            })
            .unwrap_or_default();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.into()),
            port: parsed_env("PORT", DEFAULT_PORT),
            cors_origins: split_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
            ),
            request_timeout_secs: parsed_env("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            jwt: JwtConfig::from_env(),
            email_delivery,
            storage: StorageConfig::from_env(),
            bootstrap_admin: BootstrapAdmin::from_env(),
        }
    }
}

fn parsed_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{name} has an invalid value: '{raw}'")),
        Err(_) => default,
    }
}

/// Comma-separated origin list; blanks are skipped.
fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Default public base URL for locally stored media.
const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:3000/uploads";

/// Where public photo links point.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Provider used when a tenant's settings carry an unknown value.
    pub default_provider: StorageProvider,
    pub local_base_url: String,
    pub s3_public_base_url: Option<String>,
}

impl StorageConfig {
    /// | Env Var                  | Default                          |
    /// |--------------------------|----------------------------------|
    /// | `STORAGE_PROVIDER`       | `local`                          |
    /// | `LOCAL_STORAGE_BASE_URL` | `http://localhost:3000/uploads`  |
    /// | `S3_PUBLIC_BASE_URL`     | unset (required when provider is `s3`) |
    pub fn from_env() -> Self {
        let default_provider = match std::env::var("STORAGE_PROVIDER") {
            Ok(raw) => StorageProvider::parse(raw.trim())
                .unwrap_or_else(|e| panic!("STORAGE_PROVIDER is invalid: {e}")),
            Err(_) => StorageProvider::Local,
        };
        let s3_public_base_url = std::env::var("S3_PUBLIC_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        assert!(
            default_provider != StorageProvider::S3 || s3_public_base_url.is_some(),
            "S3_PUBLIC_BASE_URL must be set when STORAGE_PROVIDER is 's3'"
        );

        Self {
            default_provider,
            local_base_url: std::env::var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LOCAL_BASE_URL.into()),
            s3_public_base_url,
        }
    }

    /// Public URL for a photo stored under the tenant's `provider`.
    ///
    /// A tenant on S3 without a configured S3 base URL gets the local URL.
    pub fn photo_url(&self, provider: &str, photo_path: &str) -> String {
        let provider = StorageProvider::parse(provider).unwrap_or(self.default_provider);
        let base = match (provider, &self.s3_public_base_url) {
            (StorageProvider::S3, Some(s3)) => s3.as_str(),
            (StorageProvider::S3, None) => {
                tracing::warn!("S3 storage selected but S3_PUBLIC_BASE_URL is unset");
                self.local_base_url.as_str()
            }
            (StorageProvider::Local, _) => self.local_base_url.as_str(),
        };
        public_photo_url(base, photo_path)
    }
}

// ---------------------------------------------------------------------------
// Bootstrap admin
// ---------------------------------------------------------------------------

/// Credentials for the first admin account.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl BootstrapAdmin {
    /// Read `BOOTSTRAP_ADMIN_USERNAME`, `BOOTSTRAP_ADMIN_EMAIL`, and
    /// `BOOTSTRAP_ADMIN_PASSWORD`. All three must be set, otherwise `None`.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            username: std::env::var("BOOTSTRAP_ADMIN_USERNAME").ok()?,
            email: std::env::var("BOOTSTRAP_ADMIN_EMAIL").ok()?,
            password: std::env::var("BOOTSTRAP_ADMIN_PASSWORD").ok()?,
        })
    }
}
