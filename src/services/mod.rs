//! Service layer for the release checker.
//!
//! - Release page fetching (`ReleaseFetcher`)

mod fetcher;

pub use fetcher::{ReleaseFetcher, ReleaseSource, extract_release_date, find_date};
