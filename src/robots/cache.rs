//! Per-host robots.txt cache entries
//!
//! One entry is created lazily on the first URL seen for a host and lives
//! for the remainder of the run; entries are never invalidated mid-run.

use crate::robots::ParsedRobots;
use chrono::{DateTime, Utc};

/// Cached robots.txt outcome for one (scheme, host)
#[derive(Debug, Clone)]
pub struct CachedRobots {
    /// Parsed rules; absent when the robots.txt fetch failed at the
    /// transport level (the gate's policy decides what that means)
    pub rules: Option<ParsedRobots>,

    /// When the fetch attempt happened
    pub fetched_at: DateTime<Utc>,
}

impl CachedRobots {
    /// Records a successful fetch (or an HTTP error treated as "no rules")
    pub fn with_rules(rules: ParsedRobots) -> Self {
        Self {
            rules: Some(rules),
            fetched_at: Utc::now(),
        }
    }

    /// Records a failed fetch attempt
    pub fn unavailable() -> Self {
        Self {
            rules: None,
            fetched_at: Utc::now(),
        }
    }
}
