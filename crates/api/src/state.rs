use std::sync::Arc;

use snapbooth_events::{EventBus, Mailer, PreviewStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: snapbooth_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// In-process event bus; cache invalidation notices travel over it.
    pub event_bus: Arc<EventBus>,
    /// Result-email delivery, chosen by `EMAIL_DELIVERY`.
    pub mailer: Arc<dyn Mailer>,
    /// Captured messages when running with the preview mailer.
    pub previews: Arc<PreviewStore>,
}
