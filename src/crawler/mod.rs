//! Crawler module: fetching, pacing, parsing, and orchestration
//!
//! - Fetching with bounded retries and backoff
//! - Randomized request spacing
//! - Link extraction from fetched HTML
//! - The sequential crawl loop tying it all together

mod coordinator;
mod fetcher;
mod limiter;
mod parser;

pub use coordinator::{build_http_client, Coordinator, CrawlStats};
pub use fetcher::{classify_error, classify_status, fetch, FailureClass, FetchError, FetchedPage, MAX_ATTEMPTS};
pub use limiter::RateLimiter;
pub use parser::extract_links;

use crate::config::Config;
use crate::CrawlError;

/// Runs a complete crawl with the given configuration
pub async fn crawl(config: Config) -> Result<CrawlStats, CrawlError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
