// src/mail/mod.rs
//! Outbound delivery of accepted submissions.

pub mod compose;
pub mod smtp;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

pub use compose::compose;
pub use smtp::SmtpMailer;

/// A composed notification, ready for any transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    /// The submitter, so the inbox owner can answer directly.
    pub reply_to_name: String,
    pub reply_to_email: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutboundMail) -> Result<()>;
}

/// Writes a one-line summary to the log instead of sending (`MAIL_TRANSPORT=log`).
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutboundMail) -> Result<()> {
        info!(
            target: "mail",
            subject = %mail.subject,
            text_len = mail.text_body.len(),
            html_len = mail.html_body.len(),
            "mail transport disabled, message not sent"
        );
        Ok(())
    }
}
