use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod page_snapshot;
pub mod price_match;
pub mod watch_item;

// Re-exports for convenience
pub use page_snapshot::*;
pub use price_match::*;
pub use watch_item::*;

/// What to do when fetching a single item fails mid-cycle.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FetchFailurePolicy {
    /// Abort the whole cycle on the first failure.
    #[default]
    Abort,
    /// Log the failure and move on to the next item.
    Skip,
}

/// What the scheduler does when a whole cycle fails.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CycleFailurePolicy {
    /// Stop scheduling and return the error.
    #[default]
    Exit,
    /// Log the error and wait for the next firing.
    Continue,
}

/// Outcome of one check cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckReport {
    pub started_at: DateTime<Utc>,
    pub items_checked: usize,
    pub items_skipped: usize,
    pub matches_found: usize,
}
