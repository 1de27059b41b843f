use crate::robots::RobotsPolicy;
use std::path::PathBuf;

/// Main configuration structure for a crawl run
#[derive(Debug, Clone)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    /// Path to the seeds file (one URL per line, `#` for comments)
    pub seeds_path: PathBuf,
    /// User-Agent header sent with every request and matched against robots.txt
    pub user_agent: String,
    /// What to do when robots.txt cannot be fetched
    pub robots_policy: RobotsPolicy,
}

/// Crawler behavior configuration
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from seed URLs (0 = seeds only)
    pub max_depth: u32,

    /// Maximum number of pages to fetch across the whole run (0 = unlimited)
    pub max_pages: u64,

    /// Minimum delay between requests in seconds
    pub delay_min: f64,

    /// Maximum delay between requests in seconds
    pub delay_max: f64,
}

/// Output layout configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Root for date-partitioned HTML pages and the index.jsonl log
    pub raw_root: PathBuf,

    /// Flat root for binary document downloads
    pub raw_files_root: PathBuf,
}

impl OutputConfig {
    /// Builds the conventional layout under a single output directory:
    /// `<dir>/raw` for pages and the index, `<dir>/raw_files` for documents.
    pub fn under(dir: &std::path::Path) -> Self {
        Self {
            raw_root: dir.join("raw"),
            raw_files_root: dir.join("raw_files"),
        }
    }
}
