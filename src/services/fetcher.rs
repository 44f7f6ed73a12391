// src/services/fetcher.rs

//! Release date fetcher.
//!
//! Downloads the release page, picks the element named by the configured
//! CSS selector, and isolates the first `YYYY-MM-DD` run in its text.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{ReleaseDate, WatchConfig};
use crate::utils::{http, normalize_whitespace};

/// Anything that can report the currently published release date.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch the current release date.
    async fn fetch_release_date(&self) -> Result<ReleaseDate>;

    /// Human-readable description of where the date comes from.
    fn describe(&self) -> String;
}

/// Fetches the release date from a web page.
pub struct ReleaseFetcher {
    client: Client,
    url: String,
    selector_src: String,
    selector: Selector,
    pattern: Regex,
}

impl ReleaseFetcher {
    /// Create a fetcher for the configured page.
    pub fn new(config: &WatchConfig, client: Client) -> Result<Self> {
        Ok(Self {
            client,
            url: config.url.clone(),
            selector_src: config.selector.clone(),
            selector: parse_selector(&config.selector)?,
            pattern: Regex::new(&config.date_pattern)?,
        })
    }
}

#[async_trait]
impl ReleaseSource for ReleaseFetcher {
    async fn fetch_release_date(&self) -> Result<ReleaseDate> {
        log::info!("Fetching release page {}", self.url);
        let body = http::fetch_text(&self.client, &self.url).await?;
        let document = Html::parse_document(&body);
        let date = extract_from_document(
            &document,
            &self.selector,
            &self.selector_src,
            &self.pattern,
        )?;
        log::info!("Published release date is {}", date);
        Ok(date)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Extract a release date from raw HTML.
pub fn extract_release_date(html: &str, selector: &str, pattern: &str) -> Result<ReleaseDate> {
    let document = Html::parse_document(html);
    let sel = parse_selector(selector)?;
    let pattern = Regex::new(pattern)?;
    extract_from_document(&document, &sel, selector, &pattern)
}

/// Isolate the first date-shaped substring of `text` and parse it.
pub fn find_date(text: &str, pattern: &Regex) -> Result<ReleaseDate> {
    let found = pattern.find(text).ok_or_else(|| AppError::DateNotFound {
        text: text.to_string(),
    })?;
    ReleaseDate::parse(found.as_str())
}

fn extract_from_document(
    document: &Html,
    selector: &Selector,
    selector_src: &str,
    pattern: &Regex,
) -> Result<ReleaseDate> {
    let element = document
        .select(selector)
        .next()
        .ok_or_else(|| AppError::element_not_found(selector_src))?;
    let raw: String = element.text().collect();
    find_date(&normalize_whitespace(&raw), pattern)
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELECTOR: &str = "span.release-date";
    const PATTERN: &str = r"\d{4}-\d{2}-\d{2}";

    fn page(inner: &str) -> String {
        format!(
            "<html><body><h1>Releases</h1><div class=\"meta\">{inner}</div></body></html>"
        )
    }

    #[test]
    fn test_extracts_bare_date() {
        let html = page(r#"<span class="release-date">2024-01-02</span>"#);
        let date = extract_release_date(&html, SELECTOR, PATTERN).unwrap();
        assert_eq!(date.to_string(), "2024-01-02");
    }

    #[test]
    fn test_tolerates_surrounding_text() {
        let html = page(
            r#"<span class="release-date">
                Latest release: <b>2024-03-15</b> (stable)
            </span>"#,
        );
        let date = extract_release_date(&html, SELECTOR, PATTERN).unwrap();
        assert_eq!(date, ReleaseDate::from_ymd(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_embedded_dates_are_isolated() {
        let pattern = Regex::new(PATTERN).unwrap();
        for (text, expected) in [
            ("2020-02-29", "2020-02-29"),
            ("v3 released 1999-12-31.", "1999-12-31"),
            ("on2024-07-04at noon", "2024-07-04"),
            ("first 2024-05-01 then 2024-06-01", "2024-05-01"),
        ] {
            assert_eq!(find_date(text, &pattern).unwrap().to_string(), expected);
        }
    }

    #[test]
    fn test_missing_element() {
        let html = page(r#"<span class="version">1.2.3</span>"#);
        let err = extract_release_date(&html, SELECTOR, PATTERN).unwrap_err();
        assert!(matches!(err, AppError::ElementNotFound { .. }));
    }

    #[test]
    fn test_no_date_in_element() {
        let html = page(r#"<span class="release-date">coming soon</span>"#);
        let err = extract_release_date(&html, SELECTOR, PATTERN).unwrap_err();
        assert!(matches!(err, AppError::DateNotFound { .. }));
    }

    #[test]
    fn test_impossible_date_in_element() {
        let html = page(r#"<span class="release-date">2024-13-40</span>"#);
        let err = extract_release_date(&html, SELECTOR, PATTERN).unwrap_err();
        assert!(matches!(err, AppError::InvalidDate { .. }));
    }

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(
            extract_release_date("<html></html>", "[[invalid", PATTERN),
            Err(AppError::Selector { .. })
        ));
    }
}
