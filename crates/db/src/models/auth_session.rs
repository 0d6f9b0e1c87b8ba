//! Refresh-token session model.

use serde::Deserialize;
use snapbooth_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `auth_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct AuthSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for opening a new session.
#[derive(Debug, Deserialize)]
pub struct CreateAuthSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
