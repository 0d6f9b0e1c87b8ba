//! First-admin provisioning at startup.

use snapbooth_core::error::CoreError;
use snapbooth_core::roles::ROLE_ADMIN;
use snapbooth_db::models::user::{CreateUser, User};
use snapbooth_db::repositories::UserRepo;
use snapbooth_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured admin account if no active admin exists.
///
/// Returns the created user, or `None` when an admin was already present.
pub async fn ensure_bootstrap_admin(
    pool: &DbPool,
    admin: &BootstrapAdmin,
) -> AppResult<Option<User>> {
    if UserRepo::count_active_by_role(pool, ROLE_ADMIN).await? > 0 {
        return Ok(None);
    }

    validate_password_strength(&admin.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.trim().to_string(),
            email: admin.email.trim().to_string(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
    Ok(Some(user))
}
