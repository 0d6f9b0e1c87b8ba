use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use snapbooth_api::auth::bootstrap::ensure_bootstrap_admin;
use snapbooth_api::config::ServerConfig;
use snapbooth_api::router::build_app_router;
use snapbooth_api::state::AppState;
use snapbooth_db::DbPool;
use snapbooth_events::{
    ActivityLog, EmailDeliveryMode, EventBus, Mailer, PreviewMailer, PreviewStore, SmtpMailer,
};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str =
    "snapbooth_api=debug,snapbooth_db=debug,snapbooth_events=debug,tower_http=debug";

/// How long the activity log gets to drain after the server stops.
const ACTIVITY_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        email_delivery = config.email_delivery.as_str(),
        storage = config.storage.default_provider.as_str(),
        bootstrap_admin = config.bootstrap_admin.is_some(),
        "Loaded server configuration"
    );

    let pool = prepare_database().await;
    if let Some(admin) = &config.bootstrap_admin {
        ensure_bootstrap_admin(&pool, admin)
            .await
            .expect("Failed to create bootstrap admin");
    }

    let event_bus = Arc::new(EventBus::default());
    let activity = spawn_activity_log(&event_bus);

    let previews = Arc::new(PreviewStore::default());
    let mailer = select_mailer(config.email_delivery, &previews);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
        mailer,
        previews,
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "SnapBooth API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // The router (and its state clone) is gone; dropping the last bus handle
    // closes the channel so the activity log can finish.
    drop(event_bus);
    match tokio::time::timeout(ACTIVITY_DRAIN_TIMEOUT, activity).await {
        Ok(Ok(logged)) => tracing::info!(logged, "Activity log drained"),
        Ok(Err(e)) => tracing::error!(error = %e, "Activity log task failed"),
        Err(_) => tracing::warn!("Activity log did not drain before the timeout"),
    }
    tracing::info!("Shutdown complete");
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, verify, and migrate. Any failure aborts startup.
async fn prepare_database() -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = snapbooth_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    snapbooth_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    snapbooth_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready");
    pool
}

fn spawn_activity_log(event_bus: &EventBus) -> JoinHandle<u64> {
    let receiver = event_bus.subscribe();
    tokio::spawn(ActivityLog::run(receiver))
}

/// `preview` captures result emails in memory; `smtp` sends them with each
/// tenant's own credentials.
fn select_mailer(mode: EmailDeliveryMode, previews: &Arc<PreviewStore>) -> Arc<dyn Mailer> {
    let mailer: Arc<dyn Mailer> = match mode {
        EmailDeliveryMode::Smtp => Arc::new(SmtpMailer::new()),
        EmailDeliveryMode::Preview => Arc::new(PreviewMailer::new(Arc::clone(previews))),
    };
    tracing::info!(mailer = mailer.kind(), "Email delivery configured");
    mailer
}

/// Resolve on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.expect("Failed to install Ctrl-C handler");
                tracing::info!(signal = "SIGINT", "Shutting down");
            }
            _ = terminate.recv() => {
                tracing::info!(signal = "SIGTERM", "Shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
        tracing::info!(signal = "SIGINT", "Shutting down");
    }
}
