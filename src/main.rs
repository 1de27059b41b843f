//! Gleaner main entry point
//!
//! Command-line interface for the crawler. Flags map one-to-one onto the
//! crawl configuration; configuration problems are fatal before any
//! crawling begins.

use clap::Parser;
use gleaner::config::{self, Config, CrawlerConfig, OutputConfig};
use gleaner::crawler::crawl;
use gleaner::robots::RobotsPolicy;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Gleaner: a politeness-aware recursive web crawler
///
/// Crawls from seed URLs breadth-first up to a depth bound, respecting
/// robots.txt and spacing requests with a randomized delay. Fetched pages
/// and documents land in a content-addressed output tree together with an
/// append-only index.jsonl metadata log.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version)]
#[command(about = "A politeness-aware recursive web crawler", long_about = None)]
struct Cli {
    /// Path to seeds file (one URL per line, # for comments)
    #[arg(long, default_value = "seeds.txt")]
    seeds: PathBuf,

    /// Maximum crawl depth from each seed (0 = seeds only)
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Minimum delay between requests in seconds
    #[arg(long, default_value_t = 1.0)]
    delay_min: f64,

    /// Maximum delay between requests in seconds
    #[arg(long, default_value_t = 3.0)]
    delay_max: f64,

    /// Maximum number of pages to fetch (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_pages: u64,

    /// User agent string sent with every request
    #[arg(long, default_value = "Mozilla/5.0 (compatible; GleanerBot/0.1)")]
    user_agent: String,

    /// Output directory, holding raw/ and raw_files/
    #[arg(long, default_value = "./data")]
    output_dir: PathBuf,

    /// What to do when a host's robots.txt cannot be fetched
    #[arg(long, value_enum, default_value_t = RobotsPolicy::FailOpen)]
    robots_policy: RobotsPolicy,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = Config {
        crawler: CrawlerConfig {
            max_depth: cli.depth,
            max_pages: cli.max_pages,
            delay_min: cli.delay_min,
            delay_max: cli.delay_max,
        },
        output: OutputConfig::under(&cli.output_dir),
        seeds_path: cli.seeds,
        user_agent: cli.user_agent,
        robots_policy: cli.robots_policy,
    };

    if let Err(e) = config::validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    match crawl(config).await {
        Ok(stats) => {
            tracing::info!(
                "Done: {} pages fetched, {} skipped, {} failed ({} entries total)",
                stats.pages_fetched,
                stats.pages_skipped,
                stats.pages_failed,
                stats.entries_processed
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
