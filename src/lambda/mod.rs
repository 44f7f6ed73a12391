// src/lambda/mod.rs

//! AWS Lambda handler.
//!
//! Each invocation performs one release check with state kept in S3.
//! Configuration comes from defaults overridden by environment variables:
//!
//! - `CHECK_URL`, `RELEASE_SELECTOR`, `HTTP_TIMEOUT_SECS`
//! - `STATE_S3_BUCKET` (required), `STATE_S3_KEY`
//! - `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`
//! - `EMAIL_FROM`, `EMAIL_TO`, `EMAIL_USER`, `EMAIL_PASS`
//! - `FORCE_NOTIFY`, `RUST_LOG`

use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::error::{AppError, Result};
use crate::models::{Config, Credentials, ReleaseDate};
use crate::notify::Notifier;
use crate::pipeline::{
    CheckReport, HeartbeatPolicy, ReleaseChecker, Transition, notify_on_error,
};
use crate::services::ReleaseFetcher;
use crate::storage::S3StateStore;
use crate::utils::http;

/// Lambda invocation payload.
#[derive(Debug, Default, Deserialize)]
pub struct CheckRequest {
    /// Send a status notification even if nothing changed
    #[serde(default)]
    pub force_notify: bool,
}

/// Lambda response payload.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub transition: Transition,
    pub release_date: ReleaseDate,
    pub notified: bool,
    pub saved: bool,
    pub execution_time_ms: u64,
}

impl CheckResponse {
    fn from_report(report: &CheckReport, execution_time_ms: u64) -> Self {
        Self {
            transition: report.transition,
            release_date: report.release_date,
            notified: report.notified,
            saved: report.saved,
            execution_time_ms,
        }
    }
}

/// Main Lambda handler function.
///
/// Failures are returned as errors so the invocation is recorded as failed.
#[instrument(skip(event))]
pub async fn handler(
    event: LambdaEvent<CheckRequest>,
) -> std::result::Result<CheckResponse, LambdaError> {
    let start = std::time::Instant::now();
    let (request, _context) = event.into_parts();

    info!("Starting release check: force_notify={}", request.force_notify);

    match run_check(&request).await {
        Ok(report) => {
            let response =
                CheckResponse::from_report(&report, start.elapsed().as_millis() as u64);
            info!(
                "Check completed: {} ({}) in {}ms",
                response.transition.as_str(),
                response.release_date,
                response.execution_time_ms
            );
            Ok(response)
        }
        Err(e) => {
            error!("Check failed: {}", e);
            Err(e.into())
        }
    }
}

/// Internal check logic.
///
/// The notifier is built before anything is validated, so configuration
/// and state-store errors are reported like any other failure.
async fn run_check(request: &CheckRequest) -> Result<CheckReport> {
    let config = lambda_config(|key| std::env::var(key).ok());
    let credentials = Credentials::from_env();
    let client = http::create_async_client(&config.http)?;
    let notifier = Notifier::from_config(&config, &credentials, client.clone());
    let name = config.watch.name.as_str();

    let bucket = notify_on_error(&notifier, name, state_bucket(&config)).await?;
    let store = notify_on_error(
        &notifier,
        name,
        S3StateStore::from_env(bucket, config.state.s3_key.clone()).await,
    )
    .await?;
    let fetcher = notify_on_error(
        &notifier,
        name,
        ReleaseFetcher::new(&config.watch, client),
    )
    .await?;
    let heartbeat = HeartbeatPolicy::from_config(
        &config.heartbeat,
        request.force_notify || credentials.force_notify,
    );

    let checker = ReleaseChecker::new(name, &fetcher, &store, &notifier, heartbeat);
    checker.run(chrono::Utc::now().date_naive()).await
}

/// Defaults overridden by environment-style lookups. Not yet validated.
fn lambda_config<F>(lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();
    config.apply_overrides(lookup);
    config
}

/// Validate the Lambda configuration and return the state bucket.
fn state_bucket(config: &Config) -> Result<String> {
    config.validate()?;
    config
        .state
        .s3_bucket
        .clone()
        .ok_or_else(|| AppError::config("STATE_S3_BUCKET is not set"))
}
