//! Role gates and tenant ownership.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use snapbooth_core::error::CoreError;
use snapbooth_core::types::DbId;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Any signed-in dashboard user. Reads as intent in handler signatures.
pub struct RequireAuth(pub AuthUser);

/// Signed-in user with the `admin` role; anyone else gets 403.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        AuthUser::from_request_parts(parts, state).await.map(Self)
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
        if user.is_admin() {
            Ok(Self(user))
        } else {
            tracing::debug!(user_id = user.user_id, role = %user.role, "Admin route refused");
            Err(CoreError::Forbidden("Only admins may do that".into()).into())
        }
    }
}

/// Whether `user` may act on a resource owned by `owner_id`. Admins may act
/// on any tenant's resources.
pub fn can_access(user: &AuthUser, owner_id: DbId) -> bool {
    user.is_admin() || user.user_id == owner_id
}

/// Check ownership, reporting a foreign resource as not found so tenants
/// cannot probe each other's ids.
pub fn ensure_owner(
    user: &AuthUser,
    owner_id: DbId,
    entity: &'static str,
    id: DbId,
) -> Result<(), AppError> {
    if can_access(user, owner_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound { entity, id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use snapbooth_core::roles::{ROLE_ADMIN, ROLE_CUSTOMER};

    fn user(id: DbId, role: &str) -> AuthUser {
        AuthUser {
            user_id: id,
            role: role.to_string(),
        }
    }

    #[test]
    fn owner_and_admin_can_access() {
        assert!(can_access(&user(1, ROLE_CUSTOMER), 1));
        assert!(can_access(&user(2, ROLE_ADMIN), 1));
        assert!(!can_access(&user(2, ROLE_CUSTOMER), 1));
    }

    #[test]
    fn foreign_resource_reports_not_found() {
        let err = ensure_owner(&user(2, ROLE_CUSTOMER), 1, "EventUrl", 9).unwrap_err();
        assert_matches!(
            err,
            AppError::Core(CoreError::NotFound { entity: "EventUrl", id: 9 })
        );
    }
}
