//! Error envelope and status mapping across the API surface.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json_auth, user_with_token};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/settings").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert!(json["error"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_garbage_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/event-urls", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_entity_is_not_found(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "nobody", "customer").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/journeys/999999", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_validation_error_envelope(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "validator", "customer").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/event-urls",
        &token,
        serde_json::json!({ "url_path": "Not A Slug!", "name": "Gala" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_event_url_is_conflict(pool: PgPool) {
    let (_a, token_a) = user_with_token(&pool, "tenant_a", "customer").await;
    let (_b, token_b) = user_with_token(&pool, "tenant_b", "customer").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "url_path": "spring-gala", "name": "Gala" });
    let first = post_json_auth(app.clone(), "/api/v1/event-urls", &token_a, body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(app, "/api/v1/event-urls", &token_b, body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_customer_cannot_reach_admin_routes(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "plain", "customer").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/admin/users", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
