//! release-watch CLI
//!
//! Local execution entry point, meant to be triggered by cron or a CI
//! schedule. For AWS Lambda, use `release-watch-lambda`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use release_watch::{
    error::Result,
    models::{Config, Credentials},
    notify::Notifier,
    pipeline::{HeartbeatPolicy, ReleaseChecker, notify_on_error},
    services::ReleaseFetcher,
    storage::{LocalStateStore, StateStore},
    utils::http,
};

/// release-watch - notify when a new release date is published
#[derive(Parser, Debug)]
#[command(name = "release-watch", version, about = "Release date watcher")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "release-watch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the release page once and notify on changes
    Check {
        /// Send a status notification even if nothing changed
        #[arg(long)]
        force_notify: bool,

        /// Override the state file location
        #[arg(long)]
        state_file: Option<PathBuf>,
    },

    /// Validate configuration and show configured channels
    Validate,

    /// Show the stored release date
    Status {
        /// Override the state file location
        #[arg(long)]
        state_file: Option<PathBuf>,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = dotenvy::dotenv() {
        log::debug!("No .env file loaded: {}", e);
    }

    let mut config = Config::load_or_default(&cli.config)?;
    config.apply_overrides(|key| std::env::var(key).ok());
    let credentials = Credentials::from_env();

    match cli.command {
        Command::Check {
            force_notify,
            state_file,
        } => {
            if let Some(path) = state_file {
                config.state.path = path;
            }

            let client = http::create_async_client(&config.http)?;
            let notifier = Notifier::from_config(&config, &credentials, client.clone());
            let fetcher = notify_on_error(
                &notifier,
                &config.watch.name,
                ReleaseFetcher::new(&config.watch, client),
            )
            .await?;
            let store = LocalStateStore::new(&config.state.path);
            let heartbeat = HeartbeatPolicy::from_config(
                &config.heartbeat,
                force_notify || credentials.force_notify,
            );

            let checker =
                ReleaseChecker::new(&config.watch.name, &fetcher, &store, &notifier, heartbeat);
            let today = chrono::Local::now().date_naive();
            let report = checker.run(today).await?;

            log::info!(
                "Check complete: {} ({}), notified: {}, saved: {}",
                report.transition.as_str(),
                report.release_date,
                report.notified,
                report.saved
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (watching {})", config.watch.url);

            let client = http::create_async_client(&config.http)?;
            let notifier = Notifier::from_config(&config, &credentials, client);
            let channels = notifier.active_channels();
            if channels.is_empty() {
                log::warn!("No notification channels configured; checks will only log.");
            } else {
                log::info!("Configured channels: {}", channels.join(", "));
            }
        }

        Command::Status { state_file } => {
            let store = LocalStateStore::new(state_file.unwrap_or(config.state.path));
            match store.load_last_date().await? {
                Some(date) => log::info!("Last known release: {} ({})", date, store.location()),
                None => log::info!("No release recorded yet at {}", store.location()),
            }
        }
    }

    Ok(())
}
