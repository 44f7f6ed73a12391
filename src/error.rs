// src/error.rs

//! Unified error handling for the release checker.

use std::fmt;

use thiserror::Error;

/// Result type alias for checker operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Broad classification of an [`AppError`].
///
/// Fetch and persistence failures abort a run without touching stored state.
/// Notification failures are captured per channel and never abort a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Fetch,
    Persistence,
    Notification,
    Config,
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed or returned a non-success status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The release date element is missing from the page
    #[error("Release date element not found (selector '{selector}')")]
    ElementNotFound { selector: String },

    /// The element exists but carries no date-looking text
    #[error("No valid date found in '{text}'")]
    DateNotFound { text: String },

    /// The page text matched the pattern but is not a real calendar date
    #[error("Invalid release date '{value}': {message}")]
    InvalidDate { value: String, message: String },

    /// The persisted state does not hold a valid date
    #[error("Invalid stored date '{value}' in {location}")]
    InvalidState { location: String, value: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// AWS S3 error
    #[error("S3 error: {0}")]
    S3(String),

    /// A notification channel failed to deliver
    #[error("{channel} notification failed: {message}")]
    Notification { channel: String, message: String },

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Regular expression compilation failed
    #[error("Invalid date pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create an "element not found" fetch error.
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// Create an invalid date error.
    pub fn invalid_date(value: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::InvalidDate {
            value: value.into(),
            message: message.to_string(),
        }
    }

    /// Create an invalid persisted state error.
    pub fn invalid_state(location: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidState {
            location: location.into(),
            value: value.into(),
        }
    }

    /// Create a notification channel error.
    pub fn notification(channel: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Notification {
            channel: channel.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Classify the error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Http(_)
            | Self::ElementNotFound { .. }
            | Self::DateNotFound { .. }
            | Self::InvalidDate { .. } => FailureKind::Fetch,
            Self::InvalidState { .. } | Self::Io(_) | Self::S3(_) => FailureKind::Persistence,
            Self::Notification { .. } => FailureKind::Notification,
            Self::Toml(_)
            | Self::Selector { .. }
            | Self::Pattern(_)
            | Self::Config(_)
            | Self::Validation(_) => FailureKind::Config,
        }
    }
}
