//! SMTP email channel.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::{EmailConfig, EmailCredentials};
use crate::notify::{Channel, Notification};

/// Sends plain-text mail over implicit-TLS SMTP with password auth.
pub struct EmailChannel {
    host: String,
    port: u16,
    subject_prefix: String,
    credentials: EmailCredentials,
}

impl EmailChannel {
    pub fn new(config: &EmailConfig, credentials: EmailCredentials) -> Self {
        Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            subject_prefix: config.subject_prefix.clone(),
            credentials,
        }
    }

    fn subject(&self, notification: &Notification) -> String {
        if self.subject_prefix.is_empty() {
            notification.subject.clone()
        } else {
            format!("{} {}", self.subject_prefix, notification.subject)
        }
    }

    /// Build the MIME message.
    fn build_message(&self, notification: &Notification) -> Result<Message> {
        let from: Mailbox = self.credentials.from.parse().map_err(|e| {
            AppError::notification(self.name(), format!("invalid from address: {e}"))
        })?;
        let to: Mailbox = self.credentials.to.parse().map_err(|e| {
            AppError::notification(self.name(), format!("invalid to address: {e}"))
        })?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject(notification))
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|e| AppError::notification(self.name(), e))
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let credentials = SmtpCredentials::new(
            self.credentials.username.clone(),
            self.credentials.password.clone(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
            .map_err(|e| AppError::notification(self.name(), e))?
            .port(self.port)
            .credentials(credentials)
            .build();
        Ok(transport)
    }
}

#[async_trait]
impl Channel for EmailChannel {
    fn name(&self) -> &'static str {
        "Email"
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        let message = self.build_message(notification)?;
        self.transport()?
            .send(message)
            .await
            .map_err(|e| AppError::notification(self.name(), e))?;
        Ok(())
    }
}
