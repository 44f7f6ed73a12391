// src/models/mod.rs

//! Domain models for the release checker.

mod config;
mod credentials;
mod release;

// Re-export all public types
pub use config::{
    Config, EmailConfig, HeartbeatConfig, HttpConfig, StateConfig, TelegramConfig, WatchConfig,
};
pub use credentials::{is_truthy, Credentials, EmailCredentials, TelegramCredentials};
pub use release::{DATE_FORMAT, ReleaseDate};
