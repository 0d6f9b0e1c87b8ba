//! Result-email delivery.
//!
//! [`Mailer`] is the seam the API sends through. [`SmtpMailer`] delivers over
//! SMTP with the tenant's own credentials using the `lettre` async transport.
//! [`PreviewMailer`] records messages in a bounded in-memory [`PreviewStore`]
//! so development setups can inspect mail without a relay.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// Why a result email did not go out. Reported to the caller as 502.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// The tenant's mail server refused us or could not be reached.
    #[error("mail server error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not assemble message: {0}")]
    Build(String),

    #[error("SMTP is not configured: {0}")]
    NotConfigured(String),
}

// ---------------------------------------------------------------------------
// Messages and credentials
// ---------------------------------------------------------------------------

/// Implicit-TLS SMTP port.
const SMTPS_PORT: u16 = 465;

/// Upper bound on a single SMTP exchange.
const SMTP_TIMEOUT: Duration = Duration::from_secs(15);

/// SMTP settings for one tenant.
#[derive(Clone)]
pub struct SmtpCredentials {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    /// RFC 5322 "From" address.
    pub from: String,
    /// Require TLS. Port 465 uses implicit TLS, any other port STARTTLS.
    pub secure: bool,
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("from", &self.from)
            .field("secure", &self.secure)
            .finish()
    }
}

/// A plain-text message ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Sends [`OutgoingEmail`]s.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `email` using the tenant's SMTP settings, if it has any.
    async fn send(
        &self,
        email: &OutgoingEmail,
        smtp: Option<&SmtpCredentials>,
    ) -> Result<(), EmailError>;

    /// Short name for logs (`"smtp"`, `"preview"`).
    fn kind(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Delivery mode
// ---------------------------------------------------------------------------

/// Which [`Mailer`] the server is wired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailDeliveryMode {
    /// Record messages in the preview store only.
    #[default]
    Preview,
    /// Deliver over SMTP.
    Smtp,
}

impl EmailDeliveryMode {
    /// Parse the `EMAIL_DELIVERY` setting. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preview" => Some(Self::Preview),
            "smtp" => Some(Self::Smtp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Smtp => "smtp",
        }
    }
}

// ---------------------------------------------------------------------------
// SmtpMailer
// ---------------------------------------------------------------------------

/// Delivers mail over SMTP with per-tenant credentials.
#[derive(Debug, Default)]
pub struct SmtpMailer;

impl SmtpMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        email: &OutgoingEmail,
        smtp: Option<&SmtpCredentials>,
    ) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let smtp = smtp.ok_or_else(|| EmailError::NotConfigured("no SMTP host set".into()))?;

        let message = Message::builder()
            .from(smtp.from.parse()?)
            .to(email.to.parse()?)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let builder = if smtp.secure && smtp.port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)?
        } else if smtp.secure {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host)
        };
        let mut builder = builder.port(smtp.port).timeout(Some(SMTP_TIMEOUT));

        if let (Some(user), Some(pass)) = (&smtp.user, &smtp.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        builder.build().send(message).await?;

        tracing::info!(to = %email.to, host = %smtp.host, "Result email sent");
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "smtp"
    }
}

// ---------------------------------------------------------------------------
// Preview store
// ---------------------------------------------------------------------------

/// Default number of messages the preview store keeps.
pub const DEFAULT_PREVIEW_CAPACITY: usize = 100;

/// A captured message.
#[derive(Debug, Clone, Serialize)]
pub struct EmailPreview {
    pub to: String,
    pub from: Option<String>,
    pub subject: String,
    pub body: String,
    /// Whether the tenant had SMTP configured when this was captured.
    pub smtp_configured: bool,
    pub captured_at: DateTime<Utc>,
}

/// Bounded in-memory log of captured messages. Oldest entries are evicted.
pub struct PreviewStore {
    capacity: usize,
    entries: RwLock<VecDeque<EmailPreview>>,
}

impl PreviewStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(VecDeque::new()),
        }
    }

    pub async fn push(&self, preview: EmailPreview) {
        let mut entries = self.entries.write().await;
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(preview);
    }

    /// Captured messages, newest first.
    pub async fn list(&self) -> Vec<EmailPreview> {
        self.entries.read().await.iter().rev().cloned().collect()
    }

    /// Drop every captured message, returning how many were removed.
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for PreviewStore {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// PreviewMailer
// ---------------------------------------------------------------------------

/// Captures mail into a [`PreviewStore`] instead of sending it.
pub struct PreviewMailer {
    store: Arc<PreviewStore>,
}

impl PreviewMailer {
    pub fn new(store: Arc<PreviewStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Mailer for PreviewMailer {
    async fn send(
        &self,
        email: &OutgoingEmail,
        smtp: Option<&SmtpCredentials>,
    ) -> Result<(), EmailError> {
        self.store
            .push(EmailPreview {
                to: email.to.clone(),
                from: smtp.map(|s| s.from.clone()),
                subject: email.subject.clone(),
                body: email.body.clone(),
                smtp_configured: smtp.is_some(),
                captured_at: Utc::now(),
            })
            .await;
        tracing::info!(to = %email.to, "Result email captured for preview");
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "preview"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(to: &str) -> OutgoingEmail {
        OutgoingEmail {
            to: to.to_string(),
            subject: "Your photos".to_string(),
            body: "Hi".to_string(),
        }
    }

    fn creds() -> SmtpCredentials {
        SmtpCredentials {
            host: "smtp.example.com".to_string(),
            port: 587,
            user: Some("booth".to_string()),
            password: Some("hunter2".to_string()),
            from: "booth@example.com".to_string(),
            secure: true,
        }
    }

    #[test]
    fn delivery_mode_parse() {
        assert_eq!(EmailDeliveryMode::parse("preview"), Some(EmailDeliveryMode::Preview));
        assert_eq!(EmailDeliveryMode::parse(" SMTP "), Some(EmailDeliveryMode::Smtp));
        assert_eq!(EmailDeliveryMode::parse("carrier-pigeon"), None);
    }

    #[test]
    fn credentials_debug_hides_password() {
        let rendered = format!("{:?}", creds());
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn missing_smtp_host_is_reported_plainly() {
        let err = EmailError::NotConfigured("no SMTP host set".to_string());
        assert_eq!(err.to_string(), "SMTP is not configured: no SMTP host set");
    }

    #[tokio::test]
    async fn smtp_mailer_requires_credentials() {
        let err = SmtpMailer::new().send(&email("g@example.com"), None).await.unwrap_err();
        assert!(matches!(err, EmailError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn smtp_mailer_rejects_bad_recipient_before_connecting() {
        let err = SmtpMailer::new()
            .send(&email("not-an-email"), Some(&creds()))
            .await
            .unwrap_err();
        assert!(matches!(err, EmailError::Address(_)));
    }

    #[tokio::test]
    async fn preview_mailer_captures_newest_first() {
        let store = Arc::new(PreviewStore::default());
        let mailer = PreviewMailer::new(Arc::clone(&store));

        mailer.send(&email("a@example.com"), None).await.unwrap();
        mailer.send(&email("b@example.com"), Some(&creds())).await.unwrap();

        let previews = store.list().await;
        assert_eq!(previews.len(), 2);
        assert_eq!(previews[0].to, "b@example.com");
        assert_eq!(previews[0].from.as_deref(), Some("booth@example.com"));
        assert!(previews[0].smtp_configured);
        assert!(!previews[1].smtp_configured);
    }

    #[tokio::test]
    async fn preview_store_is_bounded() {
        let store = Arc::new(PreviewStore::new(2));
        let mailer = PreviewMailer::new(Arc::clone(&store));
        for to in ["a@example.com", "b@example.com", "c@example.com"] {
            mailer.send(&email(to), None).await.unwrap();
        }

        let previews = store.list().await;
        assert_eq!(previews.len(), 2);
        assert_eq!(previews[1].to, "b@example.com");

        assert_eq!(store.clear().await, 2);
        assert!(store.is_empty().await);
    }
}
