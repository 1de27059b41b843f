//! Persistence layer
//!
//! Fetched content goes to a content-addressed, date-partitioned layout;
//! metadata is appended to a single JSONL index. This module is the only
//! writer of that index.
//!
//! Layout:
//! - HTML pages: `<raw_root>/<YYYYMMDD>/<hostname>_<address>.html`
//! - Documents:  `<raw_files_root>/<address>.<ext>`
//! - Index:      `<raw_root>/index.jsonl`
//!
//! The address is the SHA-256 of the URL string, so re-crawling the same URL
//! overwrites its file instead of duplicating it.

mod record;

pub use record::{Outcome, PageRecord};

use crate::config::OutputConfig;
use crate::url::{host_with_port, url_extension};
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Errors that can occur during persistence operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("URL {0} has no host, cannot derive a filename")]
    NoHost(String),
}

/// Result type for persistence operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Filesystem-backed store for crawled content and the metadata index
pub struct Store {
    raw_root: PathBuf,
    raw_files_root: PathBuf,
    index_path: PathBuf,
}

impl Store {
    /// Opens a store rooted at the configured output directories, creating
    /// the raw root (and the index's parent with it) up front.
    pub fn open(output: &OutputConfig) -> StorageResult<Self> {
        fs::create_dir_all(&output.raw_root)?;
        Ok(Self {
            raw_root: output.raw_root.clone(),
            raw_files_root: output.raw_files_root.clone(),
            index_path: output.raw_root.join("index.jsonl"),
        })
    }

    /// Saves an HTML page under today's date partition.
    ///
    /// The filename is `<hostname>_<address>.html` with `:` in the hostname
    /// replaced by `_` so ports stay filesystem-safe.
    pub fn save_page(&self, url: &Url, body: &[u8]) -> StorageResult<PathBuf> {
        let hostname = host_with_port(url)
            .ok_or_else(|| StorageError::NoHost(url.to_string()))?
            .replace(':', "_");

        let date_dir = self.raw_root.join(chrono::Utc::now().format("%Y%m%d").to_string());
        fs::create_dir_all(&date_dir)?;

        let path = date_dir.join(format!("{}_{}.html", hostname, content_address(url)));
        fs::write(&path, body)?;
        tracing::debug!("Saved page to {}", path.display());
        Ok(path)
    }

    /// Saves a binary download under the flat content-addressed layout,
    /// preserving the URL's extension (`.bin` when there is none).
    pub fn save_document(&self, url: &Url, body: &[u8]) -> StorageResult<PathBuf> {
        fs::create_dir_all(&self.raw_files_root)?;

        let ext = url_extension(url).unwrap_or_else(|| "bin".to_string());
        let path = self.raw_files_root.join(format!("{}.{}", content_address(url), ext));
        fs::write(&path, body)?;
        tracing::debug!("Saved document to {}", path.display());
        Ok(path)
    }

    /// Appends one record to the index as a self-contained JSON line.
    ///
    /// The file is opened in append mode per record so a crash never leaves
    /// a partially buffered log behind.
    pub fn append_record(&self, record: &PageRecord) -> StorageResult<()> {
        let line = serde_json::to_string(record)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.index_path)?;
        writeln!(file, "{}", line)?;
        file.flush()?;
        Ok(())
    }

    /// Path of the append-only index
    pub fn index_path(&self) -> &PathBuf {
        &self.index_path
    }
}

/// Deterministic content address for a URL: hex SHA-256 of its string form
pub fn content_address(url: &Url) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_str().as_bytes());
    hex::encode(hasher.finalize())
}
