//! Pipeline entry points for release checks.
//!
//! - `decision`: classify a fetched date and pick the follow-up action
//! - `check`: run one check end to end (`ReleaseChecker`)

pub mod check;
pub mod decision;

pub use check::{CheckReport, ReleaseChecker, notify_failure, notify_on_error};
pub use decision::{Action, HeartbeatPolicy, Transition, decide};
