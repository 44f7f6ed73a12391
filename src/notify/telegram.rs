//! Telegram Bot API channel.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::error::{AppError, Result};
use crate::models::TelegramCredentials;
use crate::notify::{Channel, Notification};

/// Sends messages through `sendMessage` of the Telegram Bot API.
pub struct TelegramChannel {
    client: Client,
    api_base: String,
    credentials: TelegramCredentials,
}

impl TelegramChannel {
    pub fn new(
        client: Client,
        api_base: impl Into<String>,
        credentials: TelegramCredentials,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            credentials,
        }
    }

    /// Full `sendMessage` URL. Contains the bot token; never log it.
    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.credentials.bot_token
        )
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &'static str {
        "Telegram"
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        let form = [
            ("chat_id", self.credentials.chat_id.as_str()),
            ("text", notification.body.as_str()),
        ];

        let response = self
            .client
            .post(self.endpoint())
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::notification(self.name(), e.without_url()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::notification(
                self.name(),
                format!("HTTP {}: {}", status.as_u16(), detail.trim()),
            ));
        }
        Ok(())
    }
}
