//! Notification message templates.

use std::fmt;

use crate::models::ReleaseDate;

/// A plain-text notification: subject for email, body for every channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// A newer release was published.
    pub fn new_release(name: &str, date: ReleaseDate) -> Self {
        Self {
            subject: format!("New {name} release: {date}"),
            body: format!("New {name} release published on {date}!"),
        }
    }

    /// Heartbeat: nothing changed, the checker is alive.
    pub fn status(name: &str, latest: ReleaseDate) -> Self {
        Self {
            subject: format!("{name} status: no new release"),
            body: format!("No new {name} release. Latest known release is still {latest}."),
        }
    }

    /// The check itself failed.
    pub fn failure(name: &str, error: impl fmt::Display) -> Self {
        Self {
            subject: format!("{name} release check failed"),
            body: format!("{name} release check failed: {error}"),
        }
    }

    /// Copy of this notification carrying a degraded-delivery note.
    pub fn with_delivery_note(&self, channel: &str, reason: &str) -> Self {
        Self {
            subject: self.subject.clone(),
            body: format!("{}\n\n[{channel} delivery failed: {reason}]", self.body),
        }
    }
}
