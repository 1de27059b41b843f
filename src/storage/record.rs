//! Per-attempt metadata records
//!
//! One `PageRecord` is appended to the index for each terminal outcome of a
//! frontier entry. Records are a log, not a table: they are never rewritten
//! or reordered, and downstream pipelines parse them line by line.

use crate::frontier::FrontierEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal outcome of one crawl attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Fetched and saved
    Success,

    /// Denied by robots.txt or otherwise not attempted
    Skipped,

    /// Retries exhausted or a permanent HTTP failure
    Failed,
}

/// One structured metadata record, serialized as a single JSON line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub status_code: Option<u16>,
    pub content_type: Option<String>,
    pub saved_path: Option<String>,
    pub crawl_date: DateTime<Utc>,
    pub depth: u32,
    pub parent_url: Option<String>,
    pub content_length: Option<u64>,
    pub outcome: Outcome,
}

impl PageRecord {
    /// Record for a successfully fetched and saved resource
    pub fn success(
        entry: &FrontierEntry,
        status_code: u16,
        content_type: Option<String>,
        saved_path: String,
        content_length: u64,
    ) -> Self {
        Self {
            url: entry.url.to_string(),
            status_code: Some(status_code),
            content_type,
            saved_path: Some(saved_path),
            crawl_date: Utc::now(),
            depth: entry.depth,
            parent_url: entry.parent.as_ref().map(|p| p.to_string()),
            content_length: Some(content_length),
            outcome: Outcome::Success,
        }
    }

    /// Record for an entry that was never fetched (robots denial)
    pub fn skipped(entry: &FrontierEntry) -> Self {
        Self {
            url: entry.url.to_string(),
            status_code: None,
            content_type: None,
            saved_path: None,
            crawl_date: Utc::now(),
            depth: entry.depth,
            parent_url: entry.parent.as_ref().map(|p| p.to_string()),
            content_length: None,
            outcome: Outcome::Skipped,
        }
    }

    /// Record for an entry whose fetch failed terminally
    pub fn failed(entry: &FrontierEntry, status_code: Option<u16>) -> Self {
        Self {
            url: entry.url.to_string(),
            status_code,
            content_type: None,
            saved_path: None,
            crawl_date: Utc::now(),
            depth: entry.depth,
            parent_url: entry.parent.as_ref().map(|p| p.to_string()),
            content_length: None,
            outcome: Outcome::Failed,
        }
    }
}
