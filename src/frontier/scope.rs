//! Crawl scope: same-host and path-prefix filtering
//!
//! Scope is anchored to the originating seed, not to whatever page a link
//! was found on: the candidate's host must equal the seed's host exactly
//! (subdomains are out), and its path must start with the seed's path
//! prefix. A seed at the host root allows the whole host.

use crate::url::host_with_port;
use crate::UrlError;
use url::Url;

/// The admissible region of one seed's traversal tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlScope {
    host: String,
    path_prefix: String,
}

impl CrawlScope {
    /// Derives the scope from a seed URL
    pub fn from_seed(seed: &Url) -> Result<Self, UrlError> {
        let host = host_with_port(seed).ok_or(UrlError::MissingHost)?;

        // Trailing slash normalized away so "/docs" and "/docs/" scope alike
        let path_prefix = seed.path().trim_end_matches('/').to_string();

        Ok(Self { host, path_prefix })
    }

    /// Checks whether a candidate URL falls inside this scope
    pub fn allows(&self, candidate: &Url) -> bool {
        match host_with_port(candidate) {
            Some(host) if host == self.host => {}
            _ => return false,
        }

        // Root or empty seed path scopes the entire host
        if self.path_prefix.is_empty() {
            return true;
        }

        candidate.path().starts_with(&self.path_prefix)
    }

    /// The seed's host (with port, if any)
    pub fn host(&self) -> &str {
        &self.host
    }
}
