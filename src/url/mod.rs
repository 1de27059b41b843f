//! URL helpers
//!
//! Host extraction and content-kind classification used by the frontier
//! filter and the persistence layer.

mod content;

pub use content::{has_document_extension, url_extension, ContentKind};

use url::Url;

/// Extracts the host from a URL, lowercased, including any port
///
/// The port matters here: the crawl scope and the saved-file naming both
/// treat `example.com:8080` as distinct from `example.com`.
pub fn host_with_port(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
