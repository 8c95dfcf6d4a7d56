//! the outbound-mail collaborator seam.
//!
//! delivery itself is out of scope; the server only needs somewhere to hand
//! the password-reset link. the concrete transport is injected at startup.

use tracing::info;

/// pluggable mail sender.
pub trait Mailer: Send + Sync {
    /// hand off a password-reset link for delivery.
    fn send_reset(&self, to: &str, name: &str, link: &str);
}

/// default mailer: records the link in the log instead of delivering it.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send_reset(&self, to: &str, name: &str, link: &str) {
        info!(to, name, link, "password reset link issued");
    }
}
