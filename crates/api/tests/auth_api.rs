//! HTTP-level integration tests for auth and admin user management.
//!
//! Tests cover login, token refresh rotation, logout, account lockout,
//! and the admin guard rails around the last admin account.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, delete_auth, get_auth, post_json, post_json_auth, put_json_auth,
    user_with_token, TEST_PASSWORD,
};
use snapbooth_api::auth::bootstrap::ensure_bootstrap_admin;
use snapbooth_api::config::BootstrapAdmin;
use snapbooth_db::repositories::UserRepo;
use sqlx::PgPool;

async fn login(app: axum::Router, username: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": username, "password": password }),
    )
    .await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_customer_login_returns_token_pair(pool: PgPool) {
    let user = create_user(&pool, "loginuser", "customer").await;
    let app = common::build_test_app(pool);

    let response = login(app, "loginuser", TEST_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert!(json["expires_in"].as_i64().unwrap() > 0);
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "customer");
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_wrong_password_is_unauthorized(pool: PgPool) {
    create_user(&pool, "wrongpw", "customer").await;
    let app = common::build_test_app(pool);

    let response = login(app, "wrongpw", "incorrect_password").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_unknown_user_matches_wrong_password(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = login(app, "ghost", TEST_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "Invalid username or password"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_account_locks_after_repeated_failures(pool: PgPool) {
    let user = create_user(&pool, "locky", "customer").await;
    let app = common::build_test_app(pool.clone());

    for _ in 0..5 {
        let response = login(app.clone(), "locky", "bad_password_value").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while locked.
    let response = login(app, "locky", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.locked_until.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_tokens(pool: PgPool) {
    create_user(&pool, "rotator", "customer").await;
    let app = common::build_test_app(pool);

    let json = body_json(login(app.clone(), "rotator", TEST_PASSWORD).await).await;
    let refresh_token = json["refresh_token"].as_str().unwrap().to_string();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let first = post_json(app.clone(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);
    let rotated = body_json(first).await;
    assert_ne!(rotated["refresh_token"], refresh_token);

    // The old refresh token was revoked by the rotation.
    let replay = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_refresh_tokens(pool: PgPool) {
    create_user(&pool, "leaver", "customer").await;
    let app = common::build_test_app(pool);

    let json = body_json(login(app.clone(), "leaver", TEST_PASSWORD).await).await;
    let access = json["access_token"].as_str().unwrap();
    let refresh = json["refresh_token"].as_str().unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/auth/logout",
        access,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_returns_current_user(pool: PgPool) {
    let (user, token) = user_with_token(&pool, "whoami", "customer").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/auth/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user.id);
    assert_eq!(json["data"]["username"], "whoami");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_creates_customer_with_case_insensitive_role(pool: PgPool) {
    let (_admin, token) = user_with_token(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/users",
        &token,
        serde_json::json!({
            "username": "newcustomer",
            "email": "new@test.com",
            "password": "a-long-enough-password",
            "role": "CUSTOMER",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["role"], "customer");

    let response = login(app, "newcustomer", "a-long-enough-password").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_create_rejects_short_password(pool: PgPool) {
    let (_admin, token) = user_with_token(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/admin/users",
        &token,
        serde_json::json!({
            "username": "shorty",
            "email": "shorty@test.com",
            "password": "short",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_last_admin_cannot_be_demoted(pool: PgPool) {
    let (admin, token) = user_with_token(&pool, "onlyadmin", "admin").await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/users/{}", admin.id),
        &token,
        serde_json::json!({ "role": "customer" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_cannot_deactivate_self(pool: PgPool) {
    let (admin, token) = user_with_token(&pool, "selfish", "admin").await;
    create_user(&pool, "backup", "admin").await;
    let app = common::build_test_app(pool);

    let response = delete_auth(app, &format!("/api/v1/admin/users/{}", admin.id), &token).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_reset_password_clears_lockout(pool: PgPool) {
    let (_admin, token) = user_with_token(&pool, "root", "admin").await;
    let user = create_user(&pool, "forgetful", "customer").await;
    let app = common::build_test_app(pool.clone());

    for _ in 0..5 {
        login(app.clone(), "forgetful", "bad_password_value").await;
    }

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{}/reset-password", user.id),
        &token,
        serde_json::json!({ "new_password": "brand-new-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = login(app, "forgetful", "brand-new-password").await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(stored.failed_login_count, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_bootstrap_admin_created_once(pool: PgPool) {
    let admin = BootstrapAdmin {
        username: "bootstrap".into(),
        email: "bootstrap@test.com".into(),
        password: "bootstrap-password".into(),
    };

    let created = ensure_bootstrap_admin(&pool, &admin).await.unwrap();
    assert_eq!(created.map(|u| u.role), Some("admin".to_string()));

    let again = ensure_bootstrap_admin(&pool, &admin).await.unwrap();
    assert!(again.is_none(), "an existing admin suppresses bootstrap");
}
