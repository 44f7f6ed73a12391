// src/pipeline/check.rs

//! One complete release check: fetch, compare, notify, persist.

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::ReleaseDate;
use crate::notify::{DeliveryReport, Notification, Notifier};
use crate::pipeline::decision::{Action, HeartbeatPolicy, Transition, decide};
use crate::services::ReleaseSource;
use crate::storage::StateStore;

/// Summary of a finished check.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub transition: Transition,
    pub release_date: ReleaseDate,
    pub previous_date: Option<ReleaseDate>,
    /// Whether a notification was sent
    pub notified: bool,
    /// Whether the state was overwritten
    pub saved: bool,
    pub delivery: Option<DeliveryReport>,
}

/// Orchestrates the collaborators of a single run.
pub struct ReleaseChecker<'a> {
    name: &'a str,
    source: &'a dyn ReleaseSource,
    store: &'a dyn StateStore,
    notifier: &'a Notifier,
    heartbeat: HeartbeatPolicy,
}

impl<'a> ReleaseChecker<'a> {
    pub fn new(
        name: &'a str,
        source: &'a dyn ReleaseSource,
        store: &'a dyn StateStore,
        notifier: &'a Notifier,
        heartbeat: HeartbeatPolicy,
    ) -> Self {
        Self {
            name,
            source,
            store,
            notifier,
            heartbeat,
        }
    }

    /// Run a check and report any failure through the notifier.
    ///
    /// The original error is returned after the failure notification has
    /// been attempted, so the caller can exit with a failure status.
    pub async fn run(&self, today: NaiveDate) -> Result<CheckReport> {
        match self.check(today).await {
            Ok(report) => Ok(report),
            Err(e) => {
                notify_failure(self.notifier, self.name, &e).await;
                Err(e)
            }
        }
    }

    /// Run a check without the failure-notification wrapper.
    pub async fn check(&self, today: NaiveDate) -> Result<CheckReport> {
        let fetched = match self.source.fetch_release_date().await {
            Ok(date) => date,
            Err(e) => {
                log::warn!(
                    "{}: could not read release date from {}",
                    Transition::FetchFailed.as_str(),
                    self.source.describe()
                );
                return Err(e);
            }
        };

        let stored = self.store.load_last_date().await?;
        let (transition, action) = decide(self.name, fetched, stored, self.heartbeat, today);

        let mut report = CheckReport {
            transition,
            release_date: fetched,
            previous_date: stored,
            notified: false,
            saved: false,
            delivery: None,
        };

        match action {
            Action::Announce { notification, date } => {
                log::info!(
                    "New release detected: {} (previous: {})",
                    date,
                    stored.map_or_else(|| "none".to_string(), |d| d.to_string())
                );
                report.delivery = Some(self.notifier.notify(&notification).await);
                report.notified = true;
                self.store.save_last_date(date).await?;
                report.saved = true;
            }
            Action::Heartbeat { notification } => {
                log::info!("No new release detected. Sending status notification.");
                report.delivery = Some(self.notifier.notify(&notification).await);
                report.notified = true;
            }
            Action::Idle => {
                log::info!("No new release detected.");
            }
        }

        Ok(report)
    }
}

/// Best-effort failure notification. Delivery problems are only logged.
pub async fn notify_failure(notifier: &Notifier, name: &str, error: &AppError) {
    log::error!("Release check failed: {}", error);
    let report = notifier.notify(&Notification::failure(name, error)).await;
    if !report.any_delivered() {
        log::warn!("Failure notification could not be delivered on any channel");
    }
}

/// Pass `result` through, sending a failure notification first if it is an error.
pub async fn notify_on_error<T>(
    notifier: &Notifier,
    name: &str,
    result: Result<T>,
) -> Result<T> {
    if let Err(e) = &result {
        notify_failure(notifier, name, e).await;
    }
    result
}
