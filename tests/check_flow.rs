//! End-to-end behavior of a single release check with stubbed collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use release_watch::error::{AppError, Result};
use release_watch::models::ReleaseDate;
use release_watch::notify::{Channel, ChannelStatus, Notification, Notifier};
use release_watch::pipeline::{HeartbeatPolicy, ReleaseChecker, Transition, notify_on_error};
use release_watch::services::ReleaseSource;
use release_watch::storage::{LocalStateStore, StateStore};
use tempfile::TempDir;

const NAME: &str = "SwissPedose";

/// Release source returning a canned result.
struct StubSource(std::result::Result<&'static str, &'static str>);

#[async_trait]
impl ReleaseSource for StubSource {
    async fn fetch_release_date(&self) -> Result<ReleaseDate> {
        match self.0 {
            Ok(date) => ReleaseDate::parse(date),
            Err(selector) => Err(AppError::element_not_found(selector)),
        }
    }

    fn describe(&self) -> String {
        "stub".to_string()
    }
}

type Outbox = Arc<Mutex<Vec<Notification>>>;

struct RecordingChannel {
    name: &'static str,
    fail: bool,
    outbox: Outbox,
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        self.outbox.lock().unwrap().push(notification.clone());
        if self.fail {
            Err(AppError::notification(self.name, "HTTP 502: Bad Gateway"))
        } else {
            Ok(())
        }
    }
}

struct Harness {
    _dir: TempDir,
    store: LocalStateStore,
    chat: Outbox,
    email: Outbox,
    notifier: Notifier,
}

impl Harness {
    fn new(chat_enabled: bool, chat_fails: bool) -> Self {
        let dir = TempDir::new().unwrap();
        let store = LocalStateStore::new(dir.path().join("last_release_date.txt"));
        let chat: Outbox = Arc::default();
        let email: Outbox = Arc::default();

        let chat_channel = chat_enabled.then(|| {
            Box::new(RecordingChannel {
                name: "Telegram",
                fail: chat_fails,
                outbox: Arc::clone(&chat),
            }) as Box<dyn Channel>
        });
        let email_channel: Box<dyn Channel> = Box::new(RecordingChannel {
            name: "Email",
            fail: false,
            outbox: Arc::clone(&email),
        });

        Self {
            _dir: dir,
            store,
            chat,
            email,
            notifier: Notifier::new(chat_channel, Some(email_channel)),
        }
    }

    async fn seed(&self, date: &str) {
        self.store
            .save_last_date(ReleaseDate::parse(date).unwrap())
            .await
            .unwrap();
    }

    async fn stored(&self) -> Option<String> {
        self.store
            .load_last_date()
            .await
            .unwrap()
            .map(|d| d.to_string())
    }

    fn email_bodies(&self) -> Vec<String> {
        self.email
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.body.clone())
            .collect()
    }
}

// 2024-01-03 is a Wednesday.
fn quiet_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
}

fn weekly(force: bool) -> HeartbeatPolicy {
    HeartbeatPolicy::new(force, Weekday::Mon)
}

#[tokio::test]
async fn new_release_notifies_and_saves() {
    let h = Harness::new(true, false);
    h.seed("2024-01-01").await;
    let source = StubSource(Ok("2024-01-02"));

    let checker = ReleaseChecker::new(NAME, &source, &h.store, &h.notifier, weekly(false));
    let report = checker.run(quiet_day()).await.unwrap();

    assert_eq!(report.transition, Transition::NewRelease);
    assert!(report.notified);
    assert!(report.saved);
    assert_eq!(h.stored().await.as_deref(), Some("2024-01-02"));
    assert_eq!(
        h.chat.lock().unwrap()[0].body,
        "New SwissPedose release published on 2024-01-02!"
    );
    assert_eq!(h.email_bodies().len(), 1);
}

#[tokio::test]
async fn first_run_without_state_is_new_release() {
    let h = Harness::new(true, false);
    let source = StubSource(Ok("2020-06-30"));

    let checker = ReleaseChecker::new(NAME, &source, &h.store, &h.notifier, weekly(false));
    let report = checker.run(quiet_day()).await.unwrap();

    assert_eq!(report.transition, Transition::NewRelease);
    assert_eq!(report.previous_date, None);
    assert_eq!(h.stored().await.as_deref(), Some("2020-06-30"));
}

#[tokio::test]
async fn unchanged_on_quiet_day_sends_nothing() {
    let h = Harness::new(true, false);
    h.seed("2024-01-01").await;
    let source = StubSource(Ok("2024-01-01"));

    let checker = ReleaseChecker::new(NAME, &source, &h.store, &h.notifier, weekly(false));
    let report = checker.run(quiet_day()).await.unwrap();

    assert_eq!(report.transition, Transition::Unchanged);
    assert!(!report.notified);
    assert!(!report.saved);
    assert!(h.chat.lock().unwrap().is_empty());
    assert!(h.email_bodies().is_empty());
    assert_eq!(h.stored().await.as_deref(), Some("2024-01-01"));
}

#[tokio::test]
async fn forced_heartbeat_sends_status_without_saving() {
    let h = Harness::new(true, false);
    h.seed("2024-01-01").await;
    let source = StubSource(Ok("2024-01-01"));

    let checker = ReleaseChecker::new(NAME, &source, &h.store, &h.notifier, weekly(true));
    let report = checker.run(quiet_day()).await.unwrap();

    assert_eq!(report.transition, Transition::Unchanged);
    assert!(report.notified);
    assert!(!report.saved);
    let bodies = h.email_bodies();
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].starts_with("No new SwissPedose release"));
    assert_eq!(h.stored().await.as_deref(), Some("2024-01-01"));
}

#[tokio::test]
async fn weekly_heartbeat_day_sends_status() {
    let h = Harness::new(true, false);
    h.seed("2024-01-01").await;
    let source = StubSource(Ok("2024-01-01"));
    let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();

    let checker = ReleaseChecker::new(NAME, &source, &h.store, &h.notifier, weekly(false));
    let report = checker.run(monday).await.unwrap();

    assert!(report.notified);
    assert_eq!(h.chat.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_element_reports_failure_and_keeps_state() {
    let h = Harness::new(true, false);
    h.seed("2024-01-01").await;
    let source = StubSource(Err("span.release-date"));

    let checker = ReleaseChecker::new(NAME, &source, &h.store, &h.notifier, weekly(true));
    let err = checker.run(quiet_day()).await.unwrap_err();

    assert!(matches!(err, AppError::ElementNotFound { .. }));
    assert_eq!(h.stored().await.as_deref(), Some("2024-01-01"));

    let bodies = h.email_bodies();
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].starts_with("SwissPedose release check failed:"));
    assert!(!bodies.iter().any(|b| b.starts_with("New ")));
}

#[tokio::test]
async fn check_alone_does_not_send_failure_notice() {
    let h = Harness::new(true, false);
    let source = StubSource(Err("span.release-date"));

    let checker = ReleaseChecker::new(NAME, &source, &h.store, &h.notifier, weekly(false));
    assert!(checker.check(quiet_day()).await.is_err());
    assert!(h.email_bodies().is_empty());
    assert_eq!(h.stored().await, None);
}

#[tokio::test]
async fn corrupt_state_aborts_without_overwrite() {
    let h = Harness::new(false, false);
    std::fs::write(h.store.path(), "not a date").unwrap();
    let source = StubSource(Ok("2024-01-02"));

    let checker = ReleaseChecker::new(NAME, &source, &h.store, &h.notifier, weekly(false));
    let err = checker.run(quiet_day()).await.unwrap_err();

    assert!(matches!(err, AppError::InvalidState { .. }));
    assert_eq!(
        std::fs::read_to_string(h.store.path()).unwrap(),
        "not a date"
    );
    assert_eq!(h.email_bodies().len(), 1);
}

#[tokio::test]
async fn missing_chat_credentials_still_email() {
    let h = Harness::new(false, false);
    let source = StubSource(Ok("2024-01-02"));

    let checker = ReleaseChecker::new(NAME, &source, &h.store, &h.notifier, weekly(false));
    let report = checker.run(quiet_day()).await.unwrap();

    let delivery = report.delivery.unwrap();
    assert_eq!(delivery.chat, ChannelStatus::Skipped);
    assert_eq!(delivery.email, ChannelStatus::Delivered);
    assert_eq!(h.email_bodies().len(), 1);
}

#[tokio::test]
async fn chat_failure_is_noted_in_email_and_run_succeeds() {
    let h = Harness::new(true, true);
    let source = StubSource(Ok("2024-01-02"));

    let checker = ReleaseChecker::new(NAME, &source, &h.store, &h.notifier, weekly(false));
    let report = checker.run(quiet_day()).await.unwrap();

    assert!(report.saved);
    assert!(report.delivery.unwrap().chat.is_failed());
    let bodies = h.email_bodies();
    assert!(bodies[0].contains("[Telegram delivery failed: HTTP 502: Bad Gateway]"));
}

#[tokio::test]
async fn setup_error_sends_failure_notice() {
    let h = Harness::new(true, false);
    let setup: Result<()> = Err(AppError::config("STATE_S3_BUCKET is not set"));

    let result = notify_on_error(&h.notifier, NAME, setup).await;

    assert!(matches!(result, Err(AppError::Config(_))));
    assert_eq!(h.chat.lock().unwrap().len(), 1);
    assert_eq!(
        h.email_bodies(),
        vec!["SwissPedose release check failed: Configuration error: STATE_S3_BUCKET is not set"]
    );
}

#[tokio::test]
async fn successful_setup_sends_nothing() {
    let h = Harness::new(true, false);

    let value = notify_on_error(&h.notifier, NAME, Ok(7)).await.unwrap();

    assert_eq!(value, 7);
    assert!(h.chat.lock().unwrap().is_empty());
    assert!(h.email_bodies().is_empty());
}
