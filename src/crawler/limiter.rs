//! Randomized request spacing
//!
//! One shared limiter paces the entire crawl loop: every fetch attempt, the
//! first try and retries alike, waits a duration drawn uniformly from
//! `[delay_min, delay_max]` first. Keeping the limiter global matches the
//! sequential single-stream design; a worker pool would have to funnel all
//! fetch paths through it to keep the spacing guarantee.

use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// Uniform-random delay gate applied before every outbound fetch
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay_min: f64,
    delay_max: f64,
}

impl RateLimiter {
    /// Creates a limiter with bounds in seconds. Bounds are assumed
    /// validated (non-negative, min <= max) by config validation.
    pub fn new(delay_min: f64, delay_max: f64) -> Self {
        Self {
            delay_min,
            delay_max,
        }
    }

    /// Sleeps for a freshly sampled delay
    pub async fn wait(&self) {
        self.wait_at_least(0.0).await;
    }

    /// Sleeps for a sampled delay with a raised lower bound, used when a
    /// host's robots.txt declares a Crawl-delay above our configured minimum.
    pub async fn wait_at_least(&self, floor_secs: f64) {
        let delay = self.sample(floor_secs);
        if delay > 0.0 {
            tracing::trace!("Waiting {:.2}s before next request", delay);
            sleep(Duration::from_secs_f64(delay)).await;
        }
    }

    /// Samples a delay in seconds; pure so the range is testable
    fn sample(&self, floor_secs: f64) -> f64 {
        let lo = self.delay_min.max(floor_secs);
        let hi = self.delay_max.max(lo);
        if hi <= 0.0 {
            return 0.0;
        }
        rand::thread_rng().gen_range(lo..=hi)
    }
}
