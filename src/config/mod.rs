//! Configuration module
//!
//! Configuration is assembled from command-line flags by the binary and
//! validated here before any crawling starts.

mod seeds;
mod types;
mod validation;

pub use seeds::load_seeds;
pub use types::{Config, CrawlerConfig, OutputConfig};
pub use validation::validate;
