//! Environment-supplied credentials.

/// Telegram bot credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

/// SMTP credentials and envelope addresses.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailCredentials {
    pub from: String,
    pub to: String,
    pub username: String,
    pub password: String,
}

/// All channel credentials plus the forced-heartbeat flag.
///
/// A channel whose credentials are incomplete is `None` and is skipped.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub telegram: Option<TelegramCredentials>,
    pub email: Option<EmailCredentials>,
    pub force_notify: bool,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary key lookup.
    ///
    /// Blank values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let telegram = match (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramCredentials { bot_token, chat_id }),
            _ => None,
        };

        let email = match (
            get("EMAIL_FROM"),
            get("EMAIL_TO"),
            get("EMAIL_USER"),
            get("EMAIL_PASS"),
        ) {
            (Some(from), Some(to), Some(username), Some(password)) => Some(EmailCredentials {
                from,
                to,
                username,
                password,
            }),
            _ => None,
        };

        let force_notify = get("FORCE_NOTIFY").is_some_and(|v| is_truthy(&v));

        Self {
            telegram,
            email,
            force_notify,
        }
    }
}

/// Interpret a boolean-like environment value.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// Secrets stay out of logs.
impl std::fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"***")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl std::fmt::Debug for EmailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailCredentials")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
