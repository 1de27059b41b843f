//! Link extraction from fetched HTML
//!
//! Pulls `<a href>` targets out of a page, resolves them against the source
//! URL, drops non-HTTP(S) schemes, strips fragments, and dedups within the
//! page. Scope filtering happens later, in the frontier.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts the set of absolute candidate URLs linked from an HTML body.
///
/// Order of first appearance is preserved so traversal stays deterministic.
pub fn extract_links(html: &str, source_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if let Some(url) = resolve_link(href, source_url) {
            if seen.insert(url.as_str().to_string()) {
                links.push(url);
            }
        }
    }

    links
}

/// Resolves one href to an absolute, fragment-free HTTP(S) URL.
///
/// Returns None for empty hrefs, fragment-only anchors, javascript:/mailto:/
/// tel:/data: targets, and anything that fails to resolve.
fn resolve_link(href: &str, source_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let mut url = source_url.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}
