//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end against a temporary output directory, then read
//! the index.jsonl log back the way downstream consumers do.

use gleaner::config::{Config, CrawlerConfig, OutputConfig};
use gleaner::crawler::{crawl, CrawlStats};
use gleaner::robots::RobotsPolicy;
use gleaner::storage::{Outcome, PageRecord};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Writes a seeds file into the temp dir and returns a ready-to-run config
fn config_for(dir: &TempDir, seeds: &[String], max_depth: u32, max_pages: u64) -> Config {
    let seeds_path = dir.path().join("seeds.txt");
    let mut file = fs::File::create(&seeds_path).unwrap();
    for seed in seeds {
        writeln!(file, "{}", seed).unwrap();
    }

    Config {
        crawler: CrawlerConfig {
            max_depth,
            max_pages,
            delay_min: 0.0,
            delay_max: 0.0,
        },
        output: OutputConfig::under(&dir.path().join("data")),
        seeds_path,
        user_agent: "TestBot/1.0".to_string(),
        robots_policy: RobotsPolicy::FailOpen,
    }
}

/// Reads all records back from index.jsonl, in append order
fn read_index(dir: &TempDir) -> Vec<PageRecord> {
    let index = dir.path().join("data/raw/index.jsonl");
    if !index.exists() {
        return Vec::new();
    }
    fs::read_to_string(index)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn record_for<'a>(records: &'a [PageRecord], url: &str) -> Option<&'a PageRecord> {
    records.iter().find(|r| r.url == url)
}

async fn mount_allow_all_robots(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .mount(server)
        .await;
}

fn html_response(body: &str) -> ResponseTemplate {
    // set_body_raw rather than set_body_string + insert_header: wiremock
    // overrides an inserted content-type with the body setter's mime
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_full_crawl_writes_pages_and_index() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_allow_all_robots(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body>
            <a href="/page1">One</a>
            <a href="/page2">Two</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_response("<html><body>leaf</body></html>"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html_response("<html><body>leaf</body></html>"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &[format!("{}/", base)], 2, 0);
    let stats: CrawlStats = crawl(config).await.unwrap();

    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.pages_failed, 0);

    let records = read_index(&dir);
    assert_eq!(records.len(), 3);

    // Seed first (FIFO), with no parent and depth 0
    assert_eq!(records[0].url, format!("{}/", base));
    assert_eq!(records[0].depth, 0);
    assert_eq!(records[0].parent_url, None);
    assert_eq!(records[0].outcome, Outcome::Success);
    assert_eq!(records[0].status_code, Some(200));

    // Discovered pages carry their parent and depth 1
    let page1 = record_for(&records, &format!("{}/page1", base)).unwrap();
    assert_eq!(page1.depth, 1);
    assert_eq!(page1.parent_url.as_deref(), Some(format!("{}/", base).as_str()));
    assert!(page1.content_type.as_deref().unwrap().contains("text/html"));
    assert!(page1.content_length.unwrap() > 0);

    // Saved files exist where the records say they are
    for record in &records {
        let saved = record.saved_path.as_deref().unwrap();
        assert!(Path::new(saved).exists(), "missing saved file {}", saved);
        assert!(saved.ends_with(".html"));
    }
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_allow_all_robots(&server).await;

    // Both pages link to /shared; it must be fetched exactly once
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body><a href="/a">a</a><a href="/b">b</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    for p in ["/a", "/b"] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(html_response(r#"<html><body><a href="/shared">s</a></body></html>"#))
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(html_response("<html><body>shared</body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &[format!("{}/", base)], 3, 0);
    crawl(config).await.unwrap();

    let records = read_index(&dir);
    let shared: Vec<_> = records
        .iter()
        .filter(|r| r.url == format!("{}/shared", base))
        .collect();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].depth, 2);
}

#[tokio::test]
async fn test_depth_zero_fetches_seeds_only() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_allow_all_robots(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body><a href="/deeper">d</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/deeper"))
        .respond_with(html_response("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &[format!("{}/", base)], 0, 0);
    let stats = crawl(config).await.unwrap();

    assert_eq!(stats.pages_fetched, 1);
    let records = read_index(&dir);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].depth, 0);
}

#[tokio::test]
async fn test_retry_ceiling_on_persistent_503() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_allow_all_robots(&server).await;

    // Exactly 3 attempts, then one Failed record and no more
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &[format!("{}/", base)], 1, 0);
    let stats = crawl(config).await.unwrap();

    assert_eq!(stats.pages_fetched, 0);
    assert_eq!(stats.pages_failed, 1);

    let records = read_index(&dir);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, Outcome::Failed);
    assert_eq!(records[0].status_code, Some(503));
    assert_eq!(records[0].saved_path, None);
}

#[tokio::test]
async fn test_permanent_404_fails_without_retry() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_allow_all_robots(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &[format!("{}/", base)], 1, 0);
    let stats = crawl(config).await.unwrap();

    assert_eq!(stats.pages_failed, 1);
    let records = read_index(&dir);
    assert_eq!(records[0].outcome, Outcome::Failed);
    assert_eq!(records[0].status_code, Some(404));
}

#[tokio::test]
async fn test_robots_disallow_produces_skipped_record() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body><a href="/private/secret">s</a><a href="/open">o</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/open"))
        .respond_with(html_response("<html></html>"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/private/secret"))
        .respond_with(html_response("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &[format!("{}/", base)], 2, 0);
    let stats = crawl(config).await.unwrap();

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.pages_skipped, 1);

    let records = read_index(&dir);
    let secret = record_for(&records, &format!("{}/private/secret", base)).unwrap();
    assert_eq!(secret.outcome, Outcome::Skipped);
    assert_eq!(secret.status_code, None);
    assert_eq!(secret.saved_path, None);
}

#[tokio::test]
async fn test_unreachable_robots_fail_closed_skips_everything() {
    // Take a port from a throwaway server, then shut it down so robots.txt
    // (and everything else) is connection-refused. The server must be
    // exclusive (builder), not pooled: a pooled server keeps listening
    // after drop.
    let server = MockServer::builder().start().await;
    let base = server.uri();
    drop(server);

    let dir = TempDir::new().unwrap();
    let mut config = config_for(&dir, &[format!("{}/", base)], 1, 0);
    config.robots_policy = RobotsPolicy::FailClosed;
    let stats = crawl(config).await.unwrap();

    assert_eq!(stats.pages_fetched, 0);
    assert_eq!(stats.pages_skipped, 1);

    let records = read_index(&dir);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, Outcome::Skipped);
}

#[tokio::test]
async fn test_document_link_downloaded_not_traversed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_allow_all_robots(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body><a href="/papers/report.pdf">r</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    // PDF body contains a link that must never be followed
    Mock::given(method("GET"))
        .and(path("/papers/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"%PDF <a href="/trap">t</a>"#.as_bytes().to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trap"))
        .respond_with(html_response("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &[format!("{}/", base)], 3, 0);
    crawl(config).await.unwrap();

    let records = read_index(&dir);
    let pdf = record_for(&records, &format!("{}/papers/report.pdf", base)).unwrap();
    assert_eq!(pdf.outcome, Outcome::Success);

    let saved = pdf.saved_path.as_deref().unwrap();
    assert!(saved.ends_with(".pdf"));
    assert!(Path::new(saved).starts_with(dir.path().join("data/raw_files")));
}

#[tokio::test]
async fn test_scope_excludes_other_hosts_and_prefixes() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_allow_all_robots(&server).await;

    // Seed scoped to /docs/; links outside the prefix or host must not be fetched
    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(html_response(&format!(
            r#"<html><body>
            <a href="/docs/guide">in</a>
            <a href="/blog/">out-prefix</a>
            <a href="https://other.invalid/page">out-host</a>
            <a href="{}/docs/guide">dup</a>
            </body></html>"#,
            base
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/guide"))
        .respond_with(html_response("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blog/"))
        .respond_with(html_response("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &[format!("{}/docs/", base)], 2, 0);
    let stats = crawl(config).await.unwrap();

    assert_eq!(stats.pages_fetched, 2);
    let records = read_index(&dir);
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_page_ceiling_stops_gracefully() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_allow_all_robots(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body>
            <a href="/p1">1</a><a href="/p2">2</a><a href="/p3">3</a><a href="/p4">4</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    for p in ["/p1", "/p2", "/p3", "/p4"] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(html_response("<html></html>"))
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &[format!("{}/", base)], 2, 2);
    let stats = crawl(config).await.unwrap();

    // Graceful stop, not an error, at exactly the ceiling
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(read_index(&dir).len(), 2);
}

#[tokio::test]
async fn test_visited_shared_across_seeds() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_allow_all_robots(&server).await;

    // The same URL seeded twice is fetched once
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &[format!("{}/", base), format!("{}/", base)], 1, 0);
    let stats = crawl(config).await.unwrap();

    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(read_index(&dir).len(), 1);
}
