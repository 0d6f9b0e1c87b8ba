//! Tenant accounts, managed by admins.
//!
//! Every handler takes [`RequireAdmin`]. The last active admin can be
//! neither demoted nor deactivated.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use snapbooth_core::email::validate_email_address;
use snapbooth_core::error::CoreError;
use snapbooth_core::roles::{validate_role, ROLE_ADMIN, ROLE_CUSTOMER};
use snapbooth_core::types::DbId;
use snapbooth_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use snapbooth_db::repositories::{AuthSessionRepo, UserRepo};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// `role` defaults to `customer`.
#[derive(Debug, Deserialize, Validate)]
pub struct NewAccount {
    #[validate(length(min = 3, max = 64, message = "must be 3-64 characters"))]
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

/// Absent fields are left alone. Passwords go through `reset-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct AccountChanges {
    #[validate(length(min = 3, max = 64, message = "must be 3-64 characters"))]
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordReset {
    pub new_password: String,
}

/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<NewAccount>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;
    validate_email_address(input.email.trim())?;
    let role = normalize_role(input.role.as_deref().unwrap_or(ROLE_CUSTOMER))?;
    let account = CreateUser {
        username: input.username.trim().to_string(),
        email: input.email.trim().to_string(),
        password_hash: checked_hash(&input.password)?,
        role,
    };
    let user = UserRepo::create(&state.pool, &account).await?;

    tracing::info!(admin_id = admin.user_id, user_id = user.id, role = %user.role, "User created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = find_user(&state, id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Update profile fields (not the password). Demoting or deactivating the
/// last active admin is rejected with 409.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AccountChanges>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input.validate()?;
    if let Some(email) = &input.email {
        validate_email_address(email.trim())?;
    }
    let role = input.role.as_deref().map(normalize_role).transpose()?;

    let existing = find_user(&state, id).await?;
    let loses_admin = role.as_deref().is_some_and(|r| r != ROLE_ADMIN)
        || input.is_active == Some(false);
    if existing.role == ROLE_ADMIN && existing.is_active && loses_admin {
        ensure_not_last_admin(&state).await?;
    }

    let user = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            username: input.username.map(|u| u.trim().to_string()),
            email: input.email.map(|e| e.trim().to_string()),
            role,
            is_active: input.is_active,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    if !user.is_active {
        AuthSessionRepo::revoke_all_for_user(&state.pool, id).await?;
    }

    tracing::info!(admin_id = admin.user_id, user_id = id, "User updated");
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft-deactivate a user and revoke their sessions. Returns 204 No Content.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "Admins cannot deactivate their own account".into(),
        )));
    }

    let existing = find_user(&state, id).await?;
    if existing.role == ROLE_ADMIN && existing.is_active {
        ensure_not_last_admin(&state).await?;
    }

    if UserRepo::deactivate(&state.pool, id).await? {
        AuthSessionRepo::revoke_all_for_user(&state.pool, id).await?;
        tracing::info!(admin_id = admin.user_id, user_id = id, "User deactivated");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/users/{id}/reset-password
///
/// Set a new password, clear any lockout, and revoke the user's sessions.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<PasswordReset>,
) -> AppResult<StatusCode> {
    let hashed = checked_hash(&input.new_password)?;
    if !UserRepo::update_password(&state.pool, id, &hashed).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    UserRepo::clear_lockout(&state.pool, id).await?;
    AuthSessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(admin_id = admin.user_id, user_id = id, "Password reset");
    Ok(StatusCode::NO_CONTENT)
}

/// Enforce the strength rules, then hash with argon2.
fn checked_hash(password: &str) -> AppResult<String> {
    validate_password_strength(password).map_err(CoreError::Validation)?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Could not hash password: {e}")))
}

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// Accept `ADMIN` / `Customer` etc. and store the lowercase role name.
fn normalize_role(raw: &str) -> Result<String, CoreError> {
    let role = raw.trim().to_ascii_lowercase();
    validate_role(&role)?;
    Ok(role)
}

async fn ensure_not_last_admin(state: &AppState) -> AppResult<()> {
    if UserRepo::count_active_by_role(&state.pool, ROLE_ADMIN).await? <= 1 {
        return Err(AppError::Core(CoreError::Conflict(
            "At least one active admin must remain".into(),
        )));
    }
    Ok(())
}
