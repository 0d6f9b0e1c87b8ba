use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    snapbooth_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "auth_sessions",
        "event_urls",
        "journeys",
        "settings",
        "event_url_settings",
        "booth_sessions",
        "booth_analytics",
        "booth_event_logs",
        "cache_versions",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Every mutable table carries an `updated_at` trigger.
#[sqlx::test(migrations = "./migrations")]
async fn test_updated_at_triggers_present(pool: PgPool) {
    let tables = [
        "users",
        "event_urls",
        "journeys",
        "settings",
        "event_url_settings",
        "booth_sessions",
    ];

    for table in tables {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM information_schema.triggers
             WHERE event_object_table = $1 AND action_statement LIKE '%set_updated_at%'",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(count > 0, "{table} should have an updated_at trigger");
    }
}
