//! Storage provider selection and public photo URLs.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const PROVIDER_LOCAL: &str = "local";
pub const PROVIDER_S3: &str = "s3";

/// Where captured media is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    Local,
    S3,
}

impl StorageProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageProvider::Local => PROVIDER_LOCAL,
            StorageProvider::S3 => PROVIDER_S3,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            PROVIDER_LOCAL => Ok(StorageProvider::Local),
            PROVIDER_S3 => Ok(StorageProvider::S3),
            other => Err(CoreError::Validation(format!(
                "Unknown storage provider '{other}'. Must be one of: local, s3"
            ))),
        }
    }
}

/// Build the public URL for a stored photo.
///
/// Paths that are already absolute `http(s)` URLs are returned unchanged.
/// Otherwise the path is joined onto `base_url` with exactly one `/`.
pub fn public_photo_url(base_url: &str, photo_path: &str) -> String {
    if photo_path.starts_with("http://") || photo_path.starts_with("https://") {
        return photo_path.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        photo_path.trim_start_matches('/')
    )
}

/// Reject empty photo paths and parent-directory traversal.
pub fn validate_photo_path(path: &str) -> Result<(), CoreError> {
    if path.trim().is_empty() {
        return Err(CoreError::Validation("Photo path must not be empty".into()));
    }
    if path.split('/').any(|segment| segment == "..") {
        return Err(CoreError::Validation(
            "Photo path must not contain '..' segments".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parse() {
        assert_eq!(StorageProvider::parse("local").unwrap(), StorageProvider::Local);
        assert_eq!(StorageProvider::parse("s3").unwrap(), StorageProvider::S3);
        assert!(StorageProvider::parse("gcs").is_err());
    }

    #[test]
    fn photo_url_joins_with_single_slash() {
        assert_eq!(
            public_photo_url("https://cdn.example.com/", "/booths/a.jpg"),
            "https://cdn.example.com/booths/a.jpg"
        );
        assert_eq!(
            public_photo_url("http://localhost:3000/uploads", "a.jpg"),
            "http://localhost:3000/uploads/a.jpg"
        );
    }

    #[test]
    fn absolute_photo_urls_pass_through() {
        assert_eq!(
            public_photo_url("https://cdn.example.com", "https://other.example.com/x.jpg"),
            "https://other.example.com/x.jpg"
        );
    }

    #[test]
    fn photo_path_rules() {
        assert!(validate_photo_path("booths/1/a.jpg").is_ok());
        assert!(validate_photo_path("").is_err());
        assert!(validate_photo_path("../etc/passwd").is_err());
    }
}
