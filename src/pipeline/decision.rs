//! Release decision policy.
//!
//! Classifies a fetched date against the stored one and decides what the
//! run should do about it.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::models::{HeartbeatConfig, ReleaseDate};
use crate::notify::Notification;

/// Outcome of comparing the published date with the stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// No prior state, or the published date is strictly later
    NewRelease,
    /// Published date is the same as (or earlier than) the stored one
    Unchanged,
    /// The release page could not be read
    FetchFailed,
}

impl Transition {
    /// Compare a successfully fetched date with the stored state.
    pub fn classify(fetched: ReleaseDate, stored: Option<ReleaseDate>) -> Self {
        match stored {
            Some(previous) if fetched <= previous => Self::Unchanged,
            _ => Self::NewRelease,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewRelease => "new_release",
            Self::Unchanged => "unchanged",
            Self::FetchFailed => "fetch_failed",
        }
    }
}

/// When to send a status message although nothing changed.
///
/// Fires if forced, or on the weekly heartbeat day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatPolicy {
    pub force: bool,
    pub weekday: Weekday,
}

impl HeartbeatPolicy {
    pub fn new(force: bool, weekday: Weekday) -> Self {
        Self { force, weekday }
    }

    /// Policy from config, with an extra force switch (CLI flag or env).
    pub fn from_config(config: &HeartbeatConfig, force: bool) -> Self {
        Self::new(config.force || force, config.weekday)
    }

    pub fn should_fire(&self, today: NaiveDate) -> bool {
        self.force || today.weekday() == self.weekday
    }
}

/// What the run does after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Announce the new release and persist its date
    Announce {
        notification: Notification,
        date: ReleaseDate,
    },
    /// Send a status message, leave state alone
    Heartbeat { notification: Notification },
    /// Nothing to send, nothing to save
    Idle,
}

/// Decide the transition and the follow-up action for a fetched date.
pub fn decide(
    name: &str,
    fetched: ReleaseDate,
    stored: Option<ReleaseDate>,
    heartbeat: HeartbeatPolicy,
    today: NaiveDate,
) -> (Transition, Action) {
    let transition = Transition::classify(fetched, stored);
    let action = match transition {
        Transition::NewRelease => Action::Announce {
            notification: Notification::new_release(name, fetched),
            date: fetched,
        },
        Transition::Unchanged if heartbeat.should_fire(today) => {
            let latest = stored.map_or(fetched, |s| s.max(fetched));
            Action::Heartbeat {
                notification: Notification::status(name, latest),
            }
        }
        Transition::Unchanged | Transition::FetchFailed => Action::Idle,
    };
    (transition, action)
}
