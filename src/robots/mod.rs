//! Politeness gate: robots.txt fetching, parsing, and caching
//!
//! The gate answers allow/deny for candidate URLs. The first URL seen for a
//! (scheme, host) pair triggers a single fetch of that host's robots.txt
//! with a short timeout and no retries, independent of the main fetcher's
//! retry policy. The outcome is cached for the rest of the run.

mod cache;
mod parser;

pub use cache::CachedRobots;
pub use parser::ParsedRobots;

use crate::url::host_with_port;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// How long the single robots.txt fetch may take
const ROBOTS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// What to do when robots.txt cannot be fetched at all
///
/// An HTTP error response (404 and friends) always means "no rules present"
/// and allows everything; the policy only applies to transport failures
/// (timeout, connection refused), where the host's wishes are unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RobotsPolicy {
    /// Treat an unreachable robots.txt as "no rules": allow all paths
    #[default]
    FailOpen,

    /// Treat an unreachable robots.txt as denying all paths
    FailClosed,
}

impl std::fmt::Display for RobotsPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FailOpen => write!(f, "fail-open"),
            Self::FailClosed => write!(f, "fail-closed"),
        }
    }
}

/// Politeness gate with a per-(scheme, host) run-lifetime cache
pub struct RobotsGate {
    cache: HashMap<(String, String), CachedRobots>,
    policy: RobotsPolicy,
    user_agent: String,
}

impl RobotsGate {
    pub fn new(policy: RobotsPolicy, user_agent: String) -> Self {
        Self {
            cache: HashMap::new(),
            policy,
            user_agent,
        }
    }

    /// Checks whether a URL may be fetched, consulting (and filling) the
    /// per-host cache.
    pub async fn is_allowed(&mut self, client: &Client, url: &Url) -> bool {
        let Some(key) = cache_key(url) else {
            // No host to ask; nothing to be polite to
            return false;
        };

        if !self.cache.contains_key(&key) {
            let entry = self.fetch_entry(client, url).await;
            self.cache.insert(key.clone(), entry);
        }

        let entry = &self.cache[&key];
        match &entry.rules {
            Some(rules) => rules.is_allowed(url.as_str(), &self.user_agent),
            None => self.policy == RobotsPolicy::FailOpen,
        }
    }

    /// Returns the cached Crawl-delay (seconds) for a URL's host, if its
    /// robots.txt declared one. Only meaningful after `is_allowed` has
    /// populated the cache for that host.
    pub fn crawl_delay(&self, url: &Url) -> Option<f64> {
        let key = cache_key(url)?;
        self.cache
            .get(&key)?
            .rules
            .as_ref()?
            .crawl_delay(&self.user_agent)
    }

    /// Number of hosts with a cache entry
    pub fn cached_hosts(&self) -> usize {
        self.cache.len()
    }

    /// Performs the single robots.txt fetch attempt for a URL's host
    async fn fetch_entry(&self, client: &Client, url: &Url) -> CachedRobots {
        let robots_url = match robots_url_for(url) {
            Some(u) => u,
            None => return CachedRobots::unavailable(),
        };

        tracing::debug!("Fetching robots.txt from {}", robots_url);

        let response = client
            .get(robots_url.clone())
            .timeout(ROBOTS_FETCH_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(body) => CachedRobots::with_rules(ParsedRobots::from_content(&body)),
                Err(e) => {
                    tracing::warn!("Failed to read robots.txt body from {}: {}", robots_url, e);
                    CachedRobots::unavailable()
                }
            },
            Ok(resp) => {
                // The host answered but has no usable robots.txt
                tracing::debug!(
                    "robots.txt at {} returned HTTP {}, treating as no rules",
                    robots_url,
                    resp.status()
                );
                CachedRobots::with_rules(ParsedRobots::allow_all())
            }
            Err(e) => {
                tracing::warn!("Could not fetch robots.txt from {}: {}", robots_url, e);
                CachedRobots::unavailable()
            }
        }
    }
}

/// Cache key for a URL: (scheme, host-with-port)
fn cache_key(url: &Url) -> Option<(String, String)> {
    Some((url.scheme().to_string(), host_with_port(url)?))
}

/// The robots.txt URL for a candidate URL's host
fn robots_url_for(url: &Url) -> Option<Url> {
    let (scheme, host) = cache_key(url)?;
    Url::parse(&format!("{}://{}/robots.txt", scheme, host)).ok()
}
