//! Integration tests for booth sessions, analytics, cache versions, and
//! account bookkeeping.

use chrono::{Duration, Utc};
use serde_json::json;
use snapbooth_core::analytics::{ANALYTICS_SESSION_COMPLETE, ANALYTICS_SESSION_START};
use snapbooth_core::roles::ROLE_CUSTOMER;
use snapbooth_db::models::analytics::{CreateBoothAnalytics, CreateBoothEventLog};
use snapbooth_db::models::auth_session::CreateAuthSession;
use snapbooth_db::models::booth_session::{BoothSessionFilter, CreateBoothSession};
use snapbooth_db::models::event_url::CreateEventUrl;
use snapbooth_db::models::user::CreateUser;
use snapbooth_db::repositories::{
    AnalyticsRepo, AuthSessionRepo, BoothSessionRepo, CacheVersionRepo, EventUrlRepo, UserRepo,
};
use sqlx::PgPool;

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "not-a-real-hash".to_string(),
        role: ROLE_CUSTOMER.to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

fn new_session(user_id: i64, event_url_id: Option<i64>, email: Option<&str>) -> CreateBoothSession {
    CreateBoothSession {
        user_id,
        event_url_id,
        photo_path: "booths/a.jpg".to_string(),
        user_name: Some("Guest".to_string()),
        user_email: email.map(str::to_string),
        started_at: None,
    }
}

fn analytics(user_id: i64, key: &str, event_type: &str) -> CreateBoothAnalytics {
    CreateBoothAnalytics {
        user_id,
        event_url_id: None,
        session_key: key.to_string(),
        event_type: event_type.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Booth sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_session_email_flag_flips(pool: PgPool) {
    let user_id = seed_user(&pool, "sessions").await;
    let session = BoothSessionRepo::create(&pool, &new_session(user_id, None, Some("g@example.com")))
        .await
        .unwrap();
    assert!(!session.email_sent);

    let updated = BoothSessionRepo::mark_email_sent(&pool, session.id)
        .await
        .unwrap()
        .unwrap();
    assert!(updated.email_sent);
    assert!(BoothSessionRepo::mark_email_sent(&pool, 999_999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_session_list_filters_by_tenant_and_event(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let gala = EventUrlRepo::create(
        &pool,
        &CreateEventUrl {
            user_id: alice,
            url_path: "/gala".to_string(),
            name: "Gala".to_string(),
        },
    )
    .await
    .unwrap();

    BoothSessionRepo::create(&pool, &new_session(alice, Some(gala.id), None)).await.unwrap();
    BoothSessionRepo::create(&pool, &new_session(alice, None, None)).await.unwrap();
    BoothSessionRepo::create(&pool, &new_session(bob, None, None)).await.unwrap();

    let alice_only = BoothSessionFilter {
        user_id: Some(alice),
        event_url_id: None,
    };
    assert_eq!(BoothSessionRepo::count(&pool, &alice_only).await.unwrap(), 2);

    let gala_only = BoothSessionFilter {
        user_id: Some(alice),
        event_url_id: Some(gala.id),
    };
    let rows = BoothSessionRepo::list(&pool, &gala_only, 50, 0).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event_url_id, Some(gala.id));

    let everyone = BoothSessionFilter::default();
    assert_eq!(BoothSessionRepo::count(&pool, &everyone).await.unwrap(), 3);
    assert_eq!(BoothSessionRepo::list(&pool, &everyone, 2, 0).await.unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_funnel_counts_distinct_sessions(pool: PgPool) {
    let user_id = seed_user(&pool, "funnel").await;

    for key in ["s1", "s2", "s3"] {
        AnalyticsRepo::record(&pool, &analytics(user_id, key, ANALYTICS_SESSION_START))
            .await
            .unwrap();
    }
    // Duplicate report from the same client.
    AnalyticsRepo::record(&pool, &analytics(user_id, "s1", ANALYTICS_SESSION_START))
        .await
        .unwrap();
    AnalyticsRepo::record(&pool, &analytics(user_id, "s1", ANALYTICS_SESSION_COMPLETE))
        .await
        .unwrap();

    let session = BoothSessionRepo::create(&pool, &new_session(user_id, None, Some("g@example.com")))
        .await
        .unwrap();
    BoothSessionRepo::mark_email_sent(&pool, session.id).await.unwrap();

    let counts = AnalyticsRepo::funnel_counts(&pool, user_id, None).await.unwrap();
    assert_eq!(counts.sessions_started, 3);
    assert_eq!(counts.sessions_completed, 1);
    assert_eq!(counts.emails_sent, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_analytics_type_rejected(pool: PgPool) {
    let user_id = seed_user(&pool, "badtype").await;
    let result = AnalyticsRepo::record(&pool, &analytics(user_id, "s1", "session_paused")).await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_recent_events_newest_first(pool: PgPool) {
    let user_id = seed_user(&pool, "steps").await;
    for name in ["capture.start", "capture.done", "share.email"] {
        AnalyticsRepo::record_event(
            &pool,
            &CreateBoothEventLog {
                user_id,
                event_url_id: None,
                session_key: "s1".to_string(),
                event_name: name.to_string(),
                metadata: json!({"step": name}),
            },
        )
        .await
        .unwrap();
    }

    let events = AnalyticsRepo::recent_events(&pool, user_id, None, 2).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_name, "share.email");
    assert_eq!(events[0].metadata["step"], "share.email");
}

// ---------------------------------------------------------------------------
// Cache versions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_cache_version_bump_is_monotonic(pool: PgPool) {
    assert_eq!(CacheVersionRepo::current(&pool, "settings", Some("/gala")).await.unwrap(), 0);

    let first = CacheVersionRepo::bump(&pool, "settings", Some("/gala")).await.unwrap();
    assert_eq!(first.version, 1);
    let second = CacheVersionRepo::bump(&pool, "settings", Some("/gala")).await.unwrap();
    assert_eq!(second.version, 2);

    // A resource-wide bump is visible to every path.
    CacheVersionRepo::bump(&pool, "settings", None).await.unwrap();
    assert_eq!(CacheVersionRepo::current(&pool, "settings", Some("/gala")).await.unwrap(), 3);
    assert_eq!(CacheVersionRepo::current(&pool, "settings", Some("/other")).await.unwrap(), 1);
    assert_eq!(CacheVersionRepo::current(&pool, "settings", None).await.unwrap(), 1);
    assert_eq!(CacheVersionRepo::current(&pool, "journeys", None).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_username_violates_constraint(pool: PgPool) {
    seed_user(&pool, "dupe").await;
    let err = UserRepo::create(
        &pool,
        &CreateUser {
            username: "dupe".to_string(),
            email: "other@example.com".to_string(),
            password_hash: "x".to_string(),
            role: ROLE_CUSTOMER.to_string(),
        },
    )
    .await
    .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_users_username"));
        }
        other => panic!("expected constraint violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_bookkeeping(pool: PgPool) {
    let user_id = seed_user(&pool, "locky").await;
    UserRepo::increment_failed_login(&pool, user_id).await.unwrap();
    UserRepo::increment_failed_login(&pool, user_id).await.unwrap();
    UserRepo::lock_account(&pool, user_id, Utc::now() + Duration::minutes(15))
        .await
        .unwrap();

    let user = UserRepo::find_by_id(&pool, user_id).await.unwrap().unwrap();
    assert_eq!(user.failed_login_count, 2);
    assert!(user.locked_until.is_some());

    UserRepo::record_successful_login(&pool, user_id).await.unwrap();
    let user = UserRepo::find_by_id(&pool, user_id).await.unwrap().unwrap();
    assert_eq!(user.failed_login_count, 0);
    assert!(user.locked_until.is_none());
    assert!(user.last_login_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_revoked_refresh_token_not_found(pool: PgPool) {
    let user_id = seed_user(&pool, "tokens").await;
    let session = AuthSessionRepo::create(
        &pool,
        &CreateAuthSession {
            user_id,
            refresh_token_hash: "abc123".to_string(),
            expires_at: Utc::now() + Duration::days(7),
        },
    )
    .await
    .unwrap();

    assert!(AuthSessionRepo::find_by_refresh_token_hash(&pool, "abc123")
        .await
        .unwrap()
        .is_some());

    AuthSessionRepo::revoke(&pool, session.id).await.unwrap();
    assert!(AuthSessionRepo::find_by_refresh_token_hash(&pool, "abc123")
        .await
        .unwrap()
        .is_none());
}
