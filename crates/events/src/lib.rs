//! SnapBooth event bus, cache invalidation notices, and email delivery.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the domain event envelope.
//! - [`InvalidationNotice`] -- typed payload of `cache.invalidated` events.
//! - [`delivery`] -- outbound email (SMTP and an in-memory preview store).
//! - [`ActivityLog`] -- background task that logs every event.

pub mod activity;
pub mod bus;
pub mod delivery;
pub mod invalidation;

pub use activity::ActivityLog;
pub use bus::{EventBus, EventSubject, PlatformEvent};
pub use delivery::email::{
    EmailDeliveryMode, EmailError, EmailPreview, Mailer, OutgoingEmail, PreviewMailer,
    PreviewStore, SmtpCredentials, SmtpMailer,
};
pub use invalidation::InvalidationNotice;
