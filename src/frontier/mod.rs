//! Crawl frontier: FIFO queue plus visited-set
//!
//! The frontier owns the traversal state for one seed's tree: the queue of
//! entries awaiting a fetch and the set of URLs already accepted. URLs enter
//! the visited set at acceptance time, before they are queued, so a URL
//! discovered from several parents at the same level is only ever queued
//! once. Traversal is breadth-first so the depth bound is enforced
//! predictably.

mod scope;

pub use scope::CrawlScope;

use std::collections::{HashSet, VecDeque};
use url::Url;

/// One unit of crawl work, consumed exactly once and never mutated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The URL to fetch
    pub url: Url,

    /// Distance from the seed (seed itself is 0)
    pub depth: u32,

    /// The page this URL was discovered on, absent for seeds
    pub parent: Option<Url>,
}

/// FIFO traversal queue with duplicate suppression and scope filtering
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    scope: CrawlScope,
    max_depth: u32,
}

impl Frontier {
    /// Creates a frontier for one seed's traversal tree.
    ///
    /// `visited` carries URLs accepted by earlier trees in the same run, so
    /// a URL reachable from two seeds is still fetched at most once.
    pub fn new(scope: CrawlScope, max_depth: u32, visited: HashSet<String>) -> Self {
        Self {
            queue: VecDeque::new(),
            visited,
            scope,
            max_depth,
        }
    }

    /// Enqueues a seed URL at depth 0.
    ///
    /// Returns false if the seed was already visited this run.
    pub fn enqueue_seed(&mut self, url: Url) -> bool {
        if !self.visited.insert(url.as_str().to_string()) {
            return false;
        }
        self.queue.push_back(FrontierEntry {
            url,
            depth: 0,
            parent: None,
        });
        true
    }

    /// Enqueues a discovered URL, silently discarding it if it was already
    /// visited, exceeds the depth bound, or falls outside the seed's scope.
    ///
    /// Returns true if the URL was accepted.
    pub fn enqueue_discovered(&mut self, url: Url, depth: u32, parent: Url) -> bool {
        if depth > self.max_depth {
            return false;
        }
        if !self.scope.allows(&url) {
            return false;
        }
        if self.visited.contains(url.as_str()) {
            return false;
        }

        // Visited before queued: dedup is atomic with acceptance
        self.visited.insert(url.as_str().to_string());
        self.queue.push_back(FrontierEntry {
            url,
            depth,
            parent: Some(parent),
        });
        true
    }

    /// Pops the next entry in FIFO order
    pub fn next(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Number of entries still queued
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The scope this frontier filters against
    pub fn scope(&self) -> &CrawlScope {
        &self.scope
    }

    /// Releases the visited set so the next seed's frontier can carry it on
    pub fn into_visited(self) -> HashSet<String> {
        self.visited
    }
}
