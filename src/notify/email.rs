use anyhow::{Context, Result};
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Message, Tokio1Executor};

use super::Notifier;
use crate::config::EmailConfig;

/// SMTP submission with STARTTLS and login credentials.
pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    pub fn new(cfg: &EmailConfig, smtp_host: &str, smtp_port: u16) -> Result<Self> {
        let from: Mailbox = cfg
            .user
            .parse()
            .with_context(|| format!("invalid EMAIL_USER address `{}`", cfg.user))?;
        let to: Mailbox = cfg
            .to
            .parse()
            .with_context(|| format!("invalid EMAIL_TO address `{}`", cfg.to))?;

        let creds = Credentials::new(cfg.user.clone(), cfg.pass.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp_host)
            .with_context(|| format!("invalid SMTP host `{smtp_host}`"))?
            .port(smtp_port)
            .credentials(creds)
            .build();

        Ok(Self { mailer, from, to })
    }

    /// The digest as a `multipart/mixed` message with one UTF-8 text part.
    pub fn build_message(&self, subject: &str, body: &str) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .multipart(MultiPart::mixed().singlepart(SinglePart::plain(body.to_string())))
            .context("build email")
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let msg = self.build_message(subject, body)?;
        self.mailer.send(msg).await.context("send email")?;
        tracing::info!(to = %self.to, "digest emailed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> EmailConfig {
        EmailConfig {
            user: "bot@example.com".into(),
            pass: "secret".into(),
            to: "equipe@example.com".into(),
        }
    }

    #[test]
    fn message_is_multipart_plain_utf8() {
        let n = EmailNotifier::new(&cfg(), "smtp.example.com", 587).unwrap();
        let msg = n
            .build_message("📢 Monitor Editais Brasil - últimos 14 dias", "Olá, editais")
            .unwrap();
        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("From: bot@example.com"));
        assert!(raw.contains("To: equipe@example.com"));
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("text/plain; charset=utf-8"));
    }

    #[test]
    fn bad_recipient_is_rejected() {
        let mut c = cfg();
        c.to = "not an address".into();
        assert!(EmailNotifier::new(&c, "smtp.example.com", 587).is_err());
    }
}
