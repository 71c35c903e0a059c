// src/mail/smtp.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{Mailbox, Message, MultiPart};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{Address, AsyncTransport, Tokio1Executor};
use tracing::info;

use super::{Mailer, OutboundMail};
use crate::config::{Encryption, SmtpSettings};

pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

fn mailbox(name: &str, email: &str) -> Result<Mailbox> {
    let addr: Address = email
        .parse()
        .with_context(|| format!("invalid mail address `{email}`"))?;
    let name = (!name.trim().is_empty()).then(|| name.trim().to_string());
    Ok(Mailbox::new(name, addr))
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpSettings) -> Result<Self> {
        let creds = Credentials::new(cfg.username.clone(), cfg.password.clone());
        let builder = match cfg.encryption {
            Encryption::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host),
            Encryption::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host),
        }
        .with_context(|| format!("invalid SMTP_HOST `{}`", cfg.host))?;

        let mailer = builder.port(cfg.port).credentials(creds).build();

        let from = mailbox(&cfg.from_name, &cfg.from_email).context("MAIL_FROM")?;
        let to = mailbox(&cfg.recipient_name, &cfg.recipient_email).context("MAIL_TO")?;

        info!(
            target: "mail",
            host = %cfg.host,
            port = cfg.port,
            encryption = ?cfg.encryption,
            "SMTP transport ready"
        );
        Ok(Self { mailer, from, to })
    }

    fn build(&self, mail: OutboundMail) -> Result<Message> {
        let reply_to = mailbox(&mail.reply_to_name, &mail.reply_to_email).context("reply-to")?;
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .reply_to(reply_to)
            .subject(mail.subject)
            .multipart(MultiPart::alternative_plain_html(
                mail.text_body,
                mail.html_body,
            ))
            .context("build email")
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutboundMail) -> Result<()> {
        let msg = self.build(mail)?;
        self.mailer.send(msg).await.context("send email")?;
        Ok(())
    }
}
