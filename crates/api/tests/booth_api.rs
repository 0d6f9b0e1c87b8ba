//! HTTP-level tests for the public booth surface, booth sessions, result
//! emails, and funnel analytics.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, get, get_auth, patch_json_auth, post_auth, post_json, post_json_auth,
    put_json_auth, user_with_token,
};
use snapbooth_api::router::build_app_router;
use snapbooth_events::{EmailDeliveryMode, SmtpMailer};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_event_url(app: axum::Router, token: &str, slug: &str) -> i64 {
    let response = post_json_auth(
        app,
        "/api/v1/event-urls",
        token,
        serde_json::json!({ "url_path": slug, "name": "Spring Gala" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn enable_email(app: axum::Router, token: &str) {
    let response = patch_json_auth(
        app,
        "/api/v1/settings",
        token,
        serde_json::json!({
            "brand_name": "Acme Booth",
            "email_enabled": "true",
            "email_subject": "Photos from {brand}",
            "email_body": "Hi {name}, grab them at {photo_url}",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn record_session(app: axum::Router, slug: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(app, &format!("/api/v1/booth/{slug}/sessions"), body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Booth config
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_booth_config_is_public_and_uncached(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "host", "customer").await;
    let app = common::build_test_app(pool);
    let event_url_id = create_event_url(app.clone(), &token, "Spring-Gala").await;

    let response = get(app, "/api/v1/booth/spring-gala").await;

    assert_eq!(response.status(), StatusCode::OK);
    let cache_control = response.headers()["cache-control"].to_str().unwrap();
    assert!(cache_control.contains("no-store"));
    assert_eq!(response.headers()["pragma"], "no-cache");

    let json = body_json(response).await;
    assert_eq!(json["data"]["event_url"]["id"], event_url_id);
    assert_eq!(json["data"]["event_url"]["url_path"], "/spring-gala");
    assert_eq!(json["data"]["settings"]["brand_name"], "Photo Booth");
    assert!(json["data"]["settings"].get("smtp_host").is_none());
    assert!(json["data"]["journey"].is_null());
    assert!(json["data"]["cache_buster"].as_str().unwrap().starts_with("v="));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_or_inactive_booth_is_not_found(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "closer", "customer").await;
    let app = common::build_test_app(pool);
    let event_url_id = create_event_url(app.clone(), &token, "closing").await;

    assert_eq!(
        get(app.clone(), "/api/v1/booth/nowhere").await.status(),
        StatusCode::NOT_FOUND
    );

    put_json_auth(
        app.clone(),
        &format!("/api/v1/event-urls/{event_url_id}"),
        &token,
        serde_json::json!({ "is_active": false }),
    )
    .await;
    assert_eq!(
        get(app.clone(), "/api/v1/booth/closing").await.status(),
        StatusCode::NOT_FOUND
    );

    assert_eq!(
        get(app, "/api/v1/booth/Bad%20Slug!").await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_booth_includes_enabled_journey(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "guide", "customer").await;
    let app = common::build_test_app(pool);
    create_event_url(app.clone(), &token, "guided").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/journeys",
        &token,
        serde_json::json!({
            "name": "Welcome flow",
            "pages": [
                { "id": "terms", "kind": "consent", "title": "House rules", "order": 2, "required": true },
                { "id": "hello", "kind": "info", "title": "Welcome", "order": 1 },
            ],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let journey_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    patch_json_auth(
        app.clone(),
        "/api/v1/settings",
        &token,
        serde_json::json!({ "custom_journey_enabled": true, "active_journey_id": journey_id }),
    )
    .await;

    let json = body_json(get(app, "/api/v1/booth/guided").await).await;
    let pages = json["data"]["journey"]["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["id"], "hello", "pages are served in order");
}

// ---------------------------------------------------------------------------
// Sessions and email
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_session_without_email_settings_sends_nothing(pool: PgPool) {
    let (user, token) = user_with_token(&pool, "quiet", "customer").await;
    let (app, state) = common::build_test_app_with_state(pool);
    create_event_url(app.clone(), &token, "quiet").await;

    let session = record_session(
        app,
        "quiet",
        serde_json::json!({ "photo_path": "booths/1/a.jpg", "user_email": "guest@example.com" }),
    )
    .await;

    assert_eq!(session["user_id"], user.id);
    assert_eq!(session["email_sent"], false);
    assert!(state.previews.is_empty().await);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_session_sends_result_email_when_enabled(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "sender", "customer").await;
    let (app, state) = common::build_test_app_with_state(pool);
    create_event_url(app.clone(), &token, "mailing").await;
    enable_email(app.clone(), &token).await;

    let session = record_session(
        app,
        "mailing",
        serde_json::json!({
            "photo_path": "booths/1/a.jpg",
            "user_name": "Ada",
            "user_email": "ada@example.com",
        }),
    )
    .await;

    assert_eq!(session["email_sent"], true);
    let previews = state.previews.list().await;
    assert_eq!(previews.len(), 1);
    assert_eq!(previews[0].to, "ada@example.com");
    assert_eq!(previews[0].subject, "Photos from Acme Booth");
    assert_eq!(
        previews[0].body,
        "Hi Ada, grab them at http://localhost:3000/uploads/booths/1/a.jpg"
    );
    assert!(!previews[0].smtp_configured);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_session_input_is_validated(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "picky", "customer").await;
    let app = common::build_test_app(pool);
    create_event_url(app.clone(), &token, "picky").await;

    for body in [
        serde_json::json!({ "photo_path": "" }),
        serde_json::json!({ "photo_path": "../../etc/passwd" }),
        serde_json::json!({ "photo_path": "a.jpg", "user_email": "not-an-address" }),
    ] {
        let response = post_json(app.clone(), "/api/v1/booth/picky/sessions", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "expected 400 for {body}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_sessions_are_tenant_scoped(pool: PgPool) {
    let (_owner, owner_token) = user_with_token(&pool, "owner", "customer").await;
    let (_other, other_token) = user_with_token(&pool, "other", "customer").await;
    let (_admin, admin_token) = user_with_token(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);
    create_event_url(app.clone(), &owner_token, "scoped").await;

    let session = record_session(
        app.clone(),
        "scoped",
        serde_json::json!({ "photo_path": "a.jpg" }),
    )
    .await;
    let session_id = session["id"].as_i64().unwrap();

    let own = body_json(get_auth(app.clone(), "/api/v1/sessions", &owner_token).await).await;
    assert_eq!(own["total"], 1);
    assert_eq!(own["data"][0]["id"], session_id);

    let foreign = body_json(get_auth(app.clone(), "/api/v1/sessions", &other_token).await).await;
    assert_eq!(foreign["total"], 0);

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}"),
        &other_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let all = body_json(get_auth(app, "/api/v1/sessions?limit=10", &admin_token).await).await;
    assert_eq!(all["total"], 1);
    assert_eq!(all["limit"], 10);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_resend_email(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "resender", "customer").await;
    let (app, state) = common::build_test_app_with_state(pool);
    create_event_url(app.clone(), &token, "resend").await;

    let with_email = record_session(
        app.clone(),
        "resend",
        serde_json::json!({ "photo_path": "a.jpg", "user_email": "guest@example.com" }),
    )
    .await;
    let without_email = record_session(
        app.clone(),
        "resend",
        serde_json::json!({ "photo_path": "b.jpg" }),
    )
    .await;

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/sessions/{}/resend-email", with_email["id"]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["email_sent"], true);
    assert_eq!(state.previews.len().await, 1);

    let response = post_auth(
        app,
        &format!("/api/v1/sessions/{}/resend-email", without_email["id"]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_smtp_mode_without_credentials_is_bad_gateway(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "smtpless", "customer").await;

    let mut config = common::test_config();
    config.email_delivery = EmailDeliveryMode::Smtp;
    let mut state = common::test_state(pool);
    state.config = Arc::new(config.clone());
    state.mailer = Arc::new(SmtpMailer::new());
    let app = build_app_router(state, &config);

    create_event_url(app.clone(), &token, "smtpless").await;
    let session = record_session(
        app.clone(),
        "smtpless",
        serde_json::json!({ "photo_path": "a.jpg", "user_email": "guest@example.com" }),
    )
    .await;

    let response = post_auth(
        app,
        &format!("/api/v1/sessions/{}/resend-email", session["id"]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "EMAIL_DELIVERY_FAILED");
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_funnel_summary(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "analyst", "customer").await;
    let app = common::build_test_app(pool);
    let event_url_id = create_event_url(app.clone(), &token, "funnel").await;

    for key in ["s1", "s2", "s2"] {
        let response = post_json(
            app.clone(),
            "/api/v1/booth/funnel/analytics",
            serde_json::json!({ "session_key": key, "event_type": "session_start" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    record_session(
        app.clone(),
        "funnel",
        serde_json::json!({ "photo_path": "a.jpg", "session_key": "s1" }),
    )
    .await;

    let json = body_json(
        get_auth(
            app,
            &format!("/api/v1/analytics/summary?eventUrlId={event_url_id}"),
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["sessions_started"], 2);
    assert_eq!(json["data"]["sessions_completed"], 1);
    assert_eq!(json["data"]["completion_rate"], 0.5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_analytics_input_is_validated(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "typist", "customer").await;
    let app = common::build_test_app(pool);
    create_event_url(app.clone(), &token, "typed").await;

    let response = post_json(
        app.clone(),
        "/api/v1/booth/typed/analytics",
        serde_json::json!({ "session_key": "s1", "event_type": "session_abandoned" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app,
        "/api/v1/booth/typed/events",
        serde_json::json!({ "session_key": "s1", "event_name": "journey.page_viewed", "metadata": [1, 2] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_step_events_feed(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "stepper", "customer").await;
    let app = common::build_test_app(pool);
    create_event_url(app.clone(), &token, "steps").await;

    for name in ["capture.started", "capture.finished"] {
        let response = post_json(
            app.clone(),
            "/api/v1/booth/steps/events",
            serde_json::json!({ "session_key": "s1", "event_name": name, "metadata": { "shot": 1 } }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(get_auth(app, "/api/v1/analytics/events?limit=1", &token).await).await;
    let events = json["data"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event_name"], "capture.finished");
    assert_eq!(events[0]["metadata"]["shot"], 1);
}
