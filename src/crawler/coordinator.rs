//! Crawl orchestration
//!
//! The coordinator sequences the whole pipeline for each frontier entry:
//! politeness check, rate-limited fetch, persistence, link discovery. It is
//! a single sequential control flow with one fetch in flight at a time; the
//! limiter wait and the fetcher's backoff are the only suspension points,
//! which keeps metadata records appended in exactly dequeue order.
//!
//! No per-URL failure ends the run. Only a seed-loading failure (fatal at
//! startup), an empty frontier, or the page ceiling stop the loop.

use crate::config::{load_seeds, Config};
use crate::crawler::fetcher::{fetch, FetchedPage};
use crate::crawler::limiter::RateLimiter;
use crate::crawler::parser::extract_links;
use crate::frontier::{CrawlScope, Frontier, FrontierEntry};
use crate::robots::RobotsGate;
use crate::storage::{PageRecord, Store};
use crate::url::ContentKind;
use crate::CrawlError;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;

/// Totals reported after a run
#[derive(Debug, Default, Clone, Copy)]
pub struct CrawlStats {
    /// Entries dequeued and resolved to a terminal outcome
    pub entries_processed: u64,

    /// Successful fetches (the quantity bounded by max_pages)
    pub pages_fetched: u64,

    /// Entries denied by robots.txt
    pub pages_skipped: u64,

    /// Entries whose fetch failed terminally
    pub pages_failed: u64,
}

/// Main crawler coordinator
pub struct Coordinator {
    config: Config,
    client: Client,
    robots: RobotsGate,
    limiter: RateLimiter,
    store: Store,
    stats: CrawlStats,
}

impl Coordinator {
    /// Builds the coordinator: HTTP client, politeness gate, limiter, store.
    ///
    /// The configuration is expected to be validated already.
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.user_agent)?;
        let robots = RobotsGate::new(config.robots_policy, config.user_agent.clone());
        let limiter = RateLimiter::new(config.crawler.delay_min, config.crawler.delay_max);
        let store = Store::open(&config.output)?;

        Ok(Self {
            config,
            client,
            robots,
            limiter,
            store,
            stats: CrawlStats::default(),
        })
    }

    /// Runs the crawl: one traversal tree per seed, breadth-first, with a
    /// visited set and page ceiling shared across all trees.
    pub async fn run(&mut self) -> Result<CrawlStats, CrawlError> {
        let seeds = load_seeds(&self.config.seeds_path)?;
        tracing::info!(
            "Starting crawl: {} seed(s), max depth {}, max pages {}",
            seeds.len(),
            self.config.crawler.max_depth,
            self.config.crawler.max_pages
        );

        let start = std::time::Instant::now();
        let mut visited: HashSet<String> = HashSet::new();

        for seed in seeds {
            if self.ceiling_reached() {
                tracing::info!("Page ceiling reached, stopping before remaining seeds");
                break;
            }

            let scope = match CrawlScope::from_seed(&seed) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Skipping seed {}: {}", seed, e);
                    continue;
                }
            };

            tracing::info!("Crawling seed {} (scope {})", seed, scope.host());
            let mut frontier =
                Frontier::new(scope, self.config.crawler.max_depth, visited);
            frontier.enqueue_seed(seed);
            self.crawl_tree(&mut frontier, start).await;
            visited = frontier.into_visited();
        }

        tracing::info!(
            "Crawl complete: {} fetched, {} skipped, {} failed in {:?}",
            self.stats.pages_fetched,
            self.stats.pages_skipped,
            self.stats.pages_failed,
            start.elapsed()
        );
        Ok(self.stats)
    }

    /// Drains one seed's frontier; the ceiling is checked between pops and
    /// is cooperative, so an in-flight fetch always finishes.
    async fn crawl_tree(&mut self, frontier: &mut Frontier, start: std::time::Instant) {
        loop {
            if self.ceiling_reached() {
                tracing::info!(
                    "Page ceiling of {} reached, stopping",
                    self.config.crawler.max_pages
                );
                break;
            }
            let Some(entry) = frontier.next() else {
                break;
            };

            self.process_entry(entry, frontier).await;
            self.stats.entries_processed += 1;

            if self.stats.entries_processed % 10 == 0 {
                let rate = self.stats.pages_fetched as f64 / start.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} fetched, {} in frontier, {:.2} pages/sec",
                    self.stats.pages_fetched,
                    frontier.len(),
                    rate
                );
            }
        }
    }

    /// Resolves one frontier entry to a terminal outcome and appends its
    /// record. A record-append failure is logged and the entry abandoned.
    async fn process_entry(&mut self, entry: FrontierEntry, frontier: &mut Frontier) {
        tracing::debug!("Processing {} at depth {}", entry.url, entry.depth);

        if !self.robots.is_allowed(&self.client, &entry.url).await {
            tracing::info!("Disallowed by robots.txt: {}", entry.url);
            self.stats.pages_skipped += 1;
            self.append_record(&PageRecord::skipped(&entry));
            return;
        }

        let delay_floor = self.robots.crawl_delay(&entry.url).unwrap_or(0.0);

        match fetch(&self.client, &self.limiter, &entry.url, delay_floor).await {
            Ok(page) => {
                self.stats.pages_fetched += 1;
                self.handle_fetched(entry, page, frontier);
            }
            Err(e) => {
                tracing::warn!("Fetch failed: {}", e);
                self.stats.pages_failed += 1;
                self.append_record(&PageRecord::failed(&entry, e.status()));
            }
        }
    }

    /// Persists a fetched resource and, for HTML within the depth bound,
    /// feeds discovered links back into the frontier at depth + 1.
    fn handle_fetched(&mut self, entry: FrontierEntry, page: FetchedPage, frontier: &mut Frontier) {
        let kind = ContentKind::classify(&entry.url, page.content_type.as_deref());

        let saved = match kind {
            ContentKind::HtmlPage => self.store.save_page(&entry.url, &page.body),
            ContentKind::BinaryDocument | ContentKind::Unsupported => {
                self.store.save_document(&entry.url, &page.body)
            }
        };

        let saved_path = match saved {
            Ok(path) => path,
            Err(e) => {
                // Abandon this entry; the run continues
                tracing::error!("Could not save content for {}: {}", entry.url, e);
                return;
            }
        };

        self.append_record(&PageRecord::success(
            &entry,
            page.status_code,
            page.content_type.clone(),
            saved_path.display().to_string(),
            page.content_length,
        ));

        if kind.is_traversable() && entry.depth < self.config.crawler.max_depth {
            let body = String::from_utf8_lossy(&page.body);
            let links = extract_links(&body, &entry.url);
            tracing::debug!("Found {} link(s) on {}", links.len(), entry.url);

            let mut accepted = 0usize;
            for link in links {
                if frontier.enqueue_discovered(link, entry.depth + 1, entry.url.clone()) {
                    accepted += 1;
                }
            }
            tracing::debug!("Enqueued {} new candidate(s) from {}", accepted, entry.url);
        }
    }

    fn append_record(&self, record: &PageRecord) {
        if let Err(e) = self.store.append_record(record) {
            tracing::error!("Could not append metadata for {}: {}", record.url, e);
        }
    }

    fn ceiling_reached(&self) -> bool {
        let max_pages = self.config.crawler.max_pages;
        max_pages > 0 && self.stats.pages_fetched >= max_pages
    }
}

/// Builds the HTTP client shared by the fetcher and the politeness gate
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}
