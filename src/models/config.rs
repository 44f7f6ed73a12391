//! Application configuration structures.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Weekday;
use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
///
/// Holds only non-secret settings; credentials come from the environment
/// (see [`Credentials`](crate::models::Credentials)).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Page to watch and how to extract the date
    #[serde(default)]
    pub watch: WatchConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Where the last known date is persisted
    #[serde(default)]
    pub state: StateConfig,

    /// "Notify anyway" policy for unchanged runs
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,

    /// Telegram endpoint settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// SMTP endpoint settings
    #[serde(default)]
    pub email: EmailConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or the defaults when the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(&path) {
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("No config file at {:?}. Using defaults.", path.as_ref());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Override settings from environment-style lookups.
    ///
    /// Unset or unparsable values leave the current setting in place.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CHECK_URL").filter(|v| !v.trim().is_empty()) {
            self.watch.url = url;
        }
        if let Some(selector) = lookup("RELEASE_SELECTOR").filter(|v| !v.trim().is_empty()) {
            self.watch.selector = selector;
        }
        if let Some(secs) = lookup("HTTP_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.http.timeout_secs = secs;
        }
        if let Some(path) = lookup("STATE_FILE").filter(|v| !v.trim().is_empty()) {
            self.state.path = PathBuf::from(path);
        }
        if let Some(bucket) = lookup("STATE_S3_BUCKET").filter(|v| !v.trim().is_empty()) {
            self.state.s3_bucket = Some(bucket);
        }
        if let Some(key) = lookup("STATE_S3_KEY").filter(|v| !v.trim().is_empty()) {
            self.state.s3_key = key;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.watch.url.trim().is_empty() {
            return Err(AppError::validation("watch.url is empty"));
        }
        if self.watch.selector.trim().is_empty() {
            return Err(AppError::validation("watch.selector is empty"));
        }
        Selector::parse(&self.watch.selector)
            .map_err(|e| AppError::selector(&self.watch.selector, format!("{e:?}")))?;
        Regex::new(&self.watch.date_pattern)?;
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.email.smtp_host.trim().is_empty() {
            return Err(AppError::validation("email.smtp_host is empty"));
        }
        if self.email.smtp_port == 0 {
            return Err(AppError::validation("email.smtp_port must be > 0"));
        }
        Ok(())
    }
}

/// Watched page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Human-readable project name used in messages
    #[serde(default = "defaults::name")]
    pub name: String,

    /// URL of the release page
    #[serde(default = "defaults::url")]
    pub url: String,

    /// CSS selector of the element holding the release date
    #[serde(default = "defaults::selector")]
    pub selector: String,

    /// Pattern isolating the date inside the element text
    #[serde(default = "defaults::date_pattern")]
    pub date_pattern: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            name: defaults::name(),
            url: defaults::url(),
            selector: defaults::selector(),
            date_pattern: defaults::date_pattern(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// State persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Local state file
    #[serde(default = "defaults::state_path")]
    pub path: PathBuf,

    /// S3 bucket for the Lambda deployment
    #[serde(default)]
    pub s3_bucket: Option<String>,

    /// S3 object key for the Lambda deployment
    #[serde(default = "defaults::s3_key")]
    pub s3_key: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: defaults::state_path(),
            s3_bucket: None,
            s3_key: defaults::s3_key(),
        }
    }
}

/// Heartbeat policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatConfig {
    /// Always send a status message when nothing changed
    #[serde(default)]
    pub force: bool,

    /// Day of the week on which a status message is always sent
    #[serde(default = "defaults::heartbeat_weekday")]
    pub weekday: Weekday,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            force: false,
            weekday: defaults::heartbeat_weekday(),
        }
    }
}

/// Telegram endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL
    #[serde(default = "defaults::telegram_api_base")]
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::telegram_api_base(),
        }
    }
}

/// SMTP endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host (implicit TLS)
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    /// SMTP relay port
    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// Prefix for the subject line
    #[serde(default = "defaults::subject_prefix")]
    pub subject_prefix: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            subject_prefix: defaults::subject_prefix(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use chrono::Weekday;

    // Watch defaults
    pub fn name() -> String {
        "SwissPedose".into()
    }
    pub fn url() -> String {
        "https://www.swisspedose.example/releases".into()
    }
    pub fn selector() -> String {
        "span.release-date".into()
    }
    pub fn date_pattern() -> String {
        r"\d{4}-\d{2}-\d{2}".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; release-watch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // State defaults
    pub fn state_path() -> PathBuf {
        PathBuf::from("last_release_date.txt")
    }
    pub fn s3_key() -> String {
        "release-watch/last_release_date.txt".into()
    }

    pub fn heartbeat_weekday() -> Weekday {
        Weekday::Mon
    }

    pub fn telegram_api_base() -> String {
        "https://api.telegram.org".into()
    }

    // Email defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        465
    }
    pub fn subject_prefix() -> String {
        "[release-watch]".into()
    }
}
