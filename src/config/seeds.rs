//! Seed file loading
//!
//! Seeds are absolute URLs, one per line. Blank lines and lines starting
//! with `#` are ignored. A missing or unreadable file is fatal at startup;
//! individual malformed lines are skipped with a warning.

use crate::ConfigError;
use std::path::Path;
use url::Url;

/// Loads seed URLs from a seeds file
///
/// # Arguments
///
/// * `path` - Path to the seeds file
///
/// # Returns
///
/// * `Ok(Vec<Url>)` - The parsed seed URLs, in file order
/// * `Err(ConfigError)` - The file could not be read, or no line yielded a
///   usable URL
pub fn load_seeds(path: &Path) -> Result<Vec<Url>, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let mut seeds = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match Url::parse(line) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                if url.host_str().is_none() {
                    tracing::warn!("Skipping seed without host on line {}: {}", line_no + 1, line);
                    continue;
                }
                seeds.push(url);
            }
            Ok(url) => {
                tracing::warn!(
                    "Skipping seed with unsupported scheme '{}' on line {}: {}",
                    url.scheme(),
                    line_no + 1,
                    line
                );
            }
            Err(e) => {
                tracing::warn!("Skipping malformed seed on line {}: {} ({})", line_no + 1, line, e);
            }
        }
    }

    if seeds.is_empty() {
        return Err(ConfigError::NoSeeds(path.display().to_string()));
    }

    Ok(seeds)
}
