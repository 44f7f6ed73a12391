//! Persistence of the last known release date.
//!
//! The state is a single line of text holding a `YYYY-MM-DD` date. It is
//! read once per run and overwritten only when a newer release is seen.
//!
//! ## Backends
//!
//! ```text
//! LocalStateStore   last_release_date.txt        (CLI, cron)
//! S3StateStore      s3://{bucket}/{key}          (Lambda, feature = "s3")
//! ```

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::ReleaseDate;

// Re-export for convenience
pub use local::LocalStateStore;
#[cfg(feature = "s3")]
pub use s3::S3StateStore;

/// Trait for state storage backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the last known release date, `None` if nothing was stored yet.
    async fn load_last_date(&self) -> Result<Option<ReleaseDate>>;

    /// Overwrite the stored release date.
    async fn save_last_date(&self, date: ReleaseDate) -> Result<()>;

    /// Where the state lives, for log messages.
    fn location(&self) -> String;
}

/// Decode stored state content.
///
/// Blank content means "no prior state"; anything else must be a strict date.
pub fn decode_state(content: &str, location: &str) -> Result<Option<ReleaseDate>> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    ReleaseDate::parse(trimmed)
        .map(Some)
        .map_err(|_| AppError::invalid_state(location, trimmed))
}

/// Encode a date as stored state content.
pub fn encode_state(date: ReleaseDate) -> String {
    format!("{date}\n")
}
