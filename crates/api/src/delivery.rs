//! Result-email delivery for booth sessions.

use snapbooth_core::email::{compose_booth_email, EmailContext};
use snapbooth_db::models::booth_session::BoothSession;
use snapbooth_db::models::settings::Settings;
use snapbooth_db::repositories::BoothSessionRepo;
use snapbooth_events::bus::EVENT_BOOTH_EMAIL_SENT;
use snapbooth_events::{
    EmailDeliveryMode, EmailError, OutgoingEmail, PlatformEvent, SmtpCredentials,
};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The tenant's SMTP credentials, if the settings row has a host, a usable
/// port, and a sender address (`smtp_from`, else an address-shaped user).
pub fn smtp_credentials(settings: &Settings) -> Option<SmtpCredentials> {
    let host = settings.smtp_host.as_deref().filter(|h| !h.trim().is_empty())?;
    let port = u16::try_from(settings.smtp_port).ok()?;
    let from = settings
        .smtp_from
        .clone()
        .filter(|f| !f.trim().is_empty())
        .or_else(|| settings.smtp_user.clone().filter(|u| u.contains('@')))?;

    Some(SmtpCredentials {
        host: host.to_string(),
        port,
        user: settings.smtp_user.clone(),
        password: settings.smtp_password.clone(),
        from,
        secure: settings.smtp_secure,
    })
}

/// Render the guest's result email for `session`.
///
/// Returns `None` when the session has no recipient address.
pub fn compose_session_email(
    state: &AppState,
    settings: &Settings,
    session: &BoothSession,
) -> Option<OutgoingEmail> {
    let to = session.user_email.as_deref().filter(|e| !e.trim().is_empty())?;
    let photo_url = state
        .config
        .storage
        .photo_url(&settings.storage_provider, &session.photo_path);

    let composed = compose_booth_email(
        &settings.email_subject,
        &settings.email_body,
        &EmailContext {
            guest_name: session.user_name.as_deref(),
            brand_name: &settings.brand_name,
            photo_url: &photo_url,
        },
    );

    Some(OutgoingEmail {
        to: to.to_string(),
        subject: composed.subject,
        body: composed.body,
    })
}

/// Send the result email for `session` and flip its `email_sent` flag.
///
/// Returns the updated session row.
pub async fn send_session_email(
    state: &AppState,
    settings: &Settings,
    session: &BoothSession,
) -> AppResult<BoothSession> {
    let email = compose_session_email(state, settings, session)
        .ok_or_else(|| AppError::BadRequest("Session has no email address".into()))?;

    let credentials = smtp_credentials(settings);
    if state.config.email_delivery == EmailDeliveryMode::Smtp && credentials.is_none() {
        return Err(AppError::Email(EmailError::NotConfigured(
            "booth settings have no SMTP host or sender address".into(),
        )));
    }

    state.mailer.send(&email, credentials.as_ref()).await?;

    let updated = BoothSessionRepo::mark_email_sent(&state.pool, session.id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    state.event_bus.publish(
        PlatformEvent::new(EVENT_BOOTH_EMAIL_SENT)
            .about("booth_session", session.id)
            .for_tenant(session.user_id)
            .with_payload(serde_json::json!({ "mailer": state.mailer.kind() })),
    );

    Ok(updated)
}
