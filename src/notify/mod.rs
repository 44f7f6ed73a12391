//! Notification delivery.
//!
//! Two independent channels are supported: a Telegram chat and an SMTP
//! mailbox. A channel without credentials is simply absent. Each channel's
//! outcome is reported separately and failures never abort a run.

mod email;
mod message;
mod telegram;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Config, Credentials};

pub use email::EmailChannel;
pub use message::Notification;
pub use telegram::TelegramChannel;

/// A single delivery channel.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Channel name used in logs and delivery notes.
    fn name(&self) -> &'static str;

    /// Deliver one notification.
    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// Outcome of one channel for one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelStatus {
    Delivered,
    /// No credentials configured
    Skipped,
    Failed(String),
}

impl ChannelStatus {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Per-channel outcomes of one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub chat: ChannelStatus,
    pub email: ChannelStatus,
}

impl DeliveryReport {
    /// At least one channel delivered the message.
    pub fn any_delivered(&self) -> bool {
        self.chat.is_delivered() || self.email.is_delivered()
    }
}

/// Dispatches notifications to the configured channels.
pub struct Notifier {
    chat: Option<Box<dyn Channel>>,
    email: Option<Box<dyn Channel>>,
}

impl Notifier {
    /// Compose a notifier from optional channels.
    pub fn new(chat: Option<Box<dyn Channel>>, email: Option<Box<dyn Channel>>) -> Self {
        Self { chat, email }
    }

    /// Build the channels for which credentials are present.
    pub fn from_config(config: &Config, credentials: &Credentials, client: Client) -> Self {
        let chat = credentials.telegram.clone().map(|creds| {
            Box::new(TelegramChannel::new(client, &config.telegram.api_base, creds))
                as Box<dyn Channel>
        });
        let email = credentials
            .email
            .clone()
            .map(|creds| Box::new(EmailChannel::new(&config.email, creds)) as Box<dyn Channel>);
        Self::new(chat, email)
    }

    /// Names of channels that will be attempted.
    pub fn active_channels(&self) -> Vec<&'static str> {
        [&self.chat, &self.email]
            .into_iter()
            .flatten()
            .map(|c| c.name())
            .collect()
    }

    /// Send a notification to every channel.
    ///
    /// The chat channel goes first. If it fails, the email copy carries a
    /// note about the failed chat delivery.
    pub async fn notify(&self, notification: &Notification) -> DeliveryReport {
        let chat = deliver(self.chat.as_deref(), "Telegram", notification).await;

        let email_copy = match &chat {
            ChannelStatus::Failed(reason) => notification.with_delivery_note("Telegram", reason),
            _ => notification.clone(),
        };
        let email = deliver(self.email.as_deref(), "Email", &email_copy).await;

        DeliveryReport { chat, email }
    }
}

async fn deliver(
    channel: Option<&dyn Channel>,
    label: &str,
    notification: &Notification,
) -> ChannelStatus {
    let Some(channel) = channel else {
        log::info!("{} credentials not set. Skipping notification.", label);
        return ChannelStatus::Skipped;
    };

    match channel.send(notification).await {
        Ok(()) => {
            log::info!("{} notification sent successfully.", channel.name());
            ChannelStatus::Delivered
        }
        Err(e) => {
            log::warn!("{}", e);
            ChannelStatus::Failed(failure_reason(&e))
        }
    }
}

fn failure_reason(error: &AppError) -> String {
    match error {
        AppError::Notification { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
