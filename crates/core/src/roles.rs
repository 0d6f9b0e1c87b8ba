//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in the users migration.

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CUSTOMER: &str = "customer";

const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_CUSTOMER];

/// Validate that `role` is one of the known role names.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {VALID_ROLES:?}"
        )))
    }
}
