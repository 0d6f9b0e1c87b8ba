//! Dashboard sign-in: password login with lockout, refresh-token rotation,
//! logout, and the current-user lookup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use snapbooth_core::error::CoreError;
use snapbooth_db::models::auth_session::CreateAuthSession;
use snapbooth_db::models::user::{User, UserResponse};
use snapbooth_db::repositories::{AuthSessionRepo, UserRepo};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Wrong passwords in a row that lock an account.
const LOCKOUT_THRESHOLD: i32 = 5;

/// How long a locked account stays locked.
const LOCKOUT_MINUTES: i64 = 15;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair handed to the dashboard, returned without a data envelope.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Same answer for an unknown user and a wrong password.
fn bad_credentials() -> AppError {
    CoreError::Unauthorized("Invalid username or password".into()).into()
}

/// Reject deactivated and currently locked accounts.
fn check_sign_in_allowed(user: &User) -> AppResult<()> {
    if !user.is_active {
        return Err(CoreError::Forbidden("Account is deactivated".into()).into());
    }
    if user.is_locked_at(Utc::now()) {
        return Err(CoreError::Forbidden(
            "Account is temporarily locked after failed logins".into(),
        )
        .into());
    }
    Ok(())
}

/// Count a wrong password and lock the account once the threshold is hit.
async fn note_failed_attempt(state: &AppState, user: &User) -> AppResult<()> {
    UserRepo::increment_failed_login(&state.pool, user.id).await?;
    if user.failed_login_count + 1 < LOCKOUT_THRESHOLD {
        return Ok(());
    }
    let until = Utc::now() + chrono::Duration::minutes(LOCKOUT_MINUTES);
    UserRepo::lock_account(&state.pool, user.id, until).await?;
    tracing::warn!(user_id = user.id, %until, "Account locked after repeated failed logins");
    Ok(())
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<TokenPair>> {
    input.validate()?;

    let Some(user) = UserRepo::find_by_username(&state.pool, input.username.trim()).await? else {
        return Err(bad_credentials());
    };
    check_sign_in_allowed(&user)?;

    let matches = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Could not verify password: {e}")))?;
    if !matches {
        note_failed_attempt(&state, &user).await?;
        return Err(bad_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(Json(issue_tokens(&state, &user).await?))
}

/// POST /api/v1/auth/refresh
///
/// Trade a live refresh token for a fresh pair; the presented token is
/// revoked whether or not the account may still sign in.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<TokenPair>> {
    let hash = hash_refresh_token(&input.refresh_token);
    let Some(session) = AuthSessionRepo::find_by_refresh_token_hash(&state.pool, &hash).await?
    else {
        return Err(CoreError::Unauthorized("Refresh token is invalid or expired".into()).into());
    };
    AuthSessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::from(CoreError::Unauthorized("Account no longer exists".into())))?;
    check_sign_in_allowed(&user)?;

    Ok(Json(issue_tokens(&state, &user).await?))
}

/// POST /api/v1/auth/logout
///
/// Revokes every refresh token the caller holds, on all devices.
pub async fn logout(State(state): State<AppState>, caller: AuthUser) -> AppResult<StatusCode> {
    let revoked = AuthSessionRepo::revoke_all_for_user(&state.pool, caller.user_id).await?;
    tracing::info!(user_id = caller.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// Sign an access token and store the hash of a new refresh token.
async fn issue_tokens(state: &AppState, user: &User) -> AppResult<TokenPair> {
    let jwt = &state.config.jwt;
    let access_token = generate_access_token(user.id, &user.role, jwt)
        .map_err(|e| AppError::InternalError(format!("Could not sign access token: {e}")))?;

    let (refresh_token, refresh_token_hash) = generate_refresh_token();
    let session = CreateAuthSession {
        user_id: user.id,
        refresh_token_hash,
        expires_at: jwt.refresh_expires_at(),
    };
    AuthSessionRepo::create(&state.pool, &session).await?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        expires_in: jwt.access_expires_in_secs(),
        user: UserResponse::from(user),
    })
}
