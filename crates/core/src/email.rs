//! Composition of the result email sent to booth guests.
//!
//! Subjects and bodies come from the tenant's settings and may contain the
//! placeholders `{name}`, `{brand}`, and `{photo_url}`. Unknown placeholders
//! are left as-is.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Name substituted for `{name}` when the guest did not give one.
pub const FALLBACK_GUEST_NAME: &str = "there";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

/// Values substituted into an email template.
#[derive(Debug, Clone)]
pub struct EmailContext<'a> {
    pub guest_name: Option<&'a str>,
    pub brand_name: &'a str,
    pub photo_url: &'a str,
}

/// A composed message ready for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedEmail {
    pub subject: String,
    pub body: String,
}

/// Substitute the known placeholders in `template`.
pub fn render_template(template: &str, ctx: &EmailContext<'_>) -> String {
    let name = ctx
        .guest_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(FALLBACK_GUEST_NAME);
    template
        .replace("{name}", name)
        .replace("{brand}", ctx.brand_name)
        .replace("{photo_url}", ctx.photo_url)
}

/// Compose the guest's result email from the configured subject and body.
///
/// If the body does not reference `{photo_url}` the link is appended so the
/// guest always receives it.
pub fn compose_booth_email(subject: &str, body: &str, ctx: &EmailContext<'_>) -> ComposedEmail {
    let mut rendered_body = render_template(body, ctx);
    if !body.contains("{photo_url}") {
        rendered_body.push_str("\n\n");
        rendered_body.push_str(ctx.photo_url);
    }
    ComposedEmail {
        subject: render_template(subject, ctx),
        body: rendered_body,
    }
}

/// Loose syntactic check for a recipient address.
pub fn validate_email_address(address: &str) -> Result<(), CoreError> {
    if EMAIL_RE.is_match(address) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid email address '{address}'"
        )))
    }
}
