//! Content kind classification
//!
//! Fetched resources are dispatched over a small tagged variant rather than
//! open-ended content-type sniffing: HTML pages are parsed for links, binary
//! documents are downloaded as-is, and everything else is stored without
//! further traversal.

use url::Url;

/// Document file extensions that are downloaded directly, never re-crawled
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// What a fetched resource is, for dispatch purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// An HTML page: saved under the date partition and parsed for links
    HtmlPage,

    /// A document file (pdf/doc/docx): downloaded, never parsed or traversed
    BinaryDocument,

    /// Anything else: stored as a binary download, no traversal
    Unsupported,
}

impl ContentKind {
    /// Classifies a resource from its URL and the declared Content-Type.
    ///
    /// The URL extension wins: a link ending in `.pdf` is a document even if
    /// the server mislabels it. Otherwise the Content-Type decides whether
    /// the body is parseable HTML.
    pub fn classify(url: &Url, content_type: Option<&str>) -> Self {
        if has_document_extension(url) {
            return Self::BinaryDocument;
        }

        match content_type {
            Some(ct) if ct.to_ascii_lowercase().contains("text/html") => Self::HtmlPage,
            _ => Self::Unsupported,
        }
    }

    /// Returns true if link extraction applies to this kind
    pub fn is_traversable(&self) -> bool {
        matches!(self, Self::HtmlPage)
    }
}

/// Checks whether a URL's path ends in a known document extension
pub fn has_document_extension(url: &Url) -> bool {
    url_extension(url)
        .map(|ext| DOCUMENT_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Extracts the lowercase extension from a URL's path, if any
pub fn url_extension(url: &Url) -> Option<String> {
    let path = url.path();
    let last_segment = path.rsplit('/').next()?;
    let (_, ext) = last_segment.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}
