//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl-export-import cycle end-to-end.

use sitemapper::config::CrawlerConfig;
use sitemapper::crawler::crawl;
use sitemapper::output::{csv_path_for, export_site_map};
use sitemapper::storage::SiteDatabase;
use sitemapper::url::netloc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates crawl settings for testing
fn crawl_settings(max_threads: usize, max_depth: Option<u32>) -> CrawlerConfig {
    CrawlerConfig {
        max_threads,
        max_depth,
        notify_threshold: None,
    }
}

/// Mounts a page responding with the given HTML body
async fn mount_page(server: &MockServer, url_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_stays_on_seed_host() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<html><body>
            <a href="{}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        r#"<html><body><a href="/page2">Page 2</a><a href="/">Home</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/page2", "<html><body>leaf</body></html>".to_string()).await;

    let seed = format!("{}/", base_url);
    let outcome = crawl(&seed, &crawl_settings(4, None)).await.expect("Crawl failed");

    // Every visited URL shares the seed's host
    let seed_host = netloc(&seed).expect("Failed to extract seed host");
    for url in outcome.site_map.keys() {
        assert_eq!(netloc(url), Some(seed_host.clone()), "URL {} off-host", url);
    }

    // Three pages visited, key sets aligned across all three structures
    assert_eq!(outcome.site_map.len(), 3);
    assert_eq!(outcome.timestamps.len(), 3);
    assert_eq!(outcome.visit_order.len(), 3);
    for url in &outcome.visit_order {
        assert!(outcome.site_map.contains_key(url));
        assert!(outcome.timestamps.contains_key(url));
    }

    // Children recorded in discovery order
    assert_eq!(
        outcome.site_map[&seed],
        vec![format!("{}/page1", base_url), format!("{}/page2", base_url)]
    );
}

#[tokio::test]
async fn test_off_domain_links_are_excluded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // The off-domain link sits between two in-scope ones
    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
        <a href="/a">a</a>
        <a href="http://other.invalid/b">b</a>
        <a href="/c">c</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(&mock_server, "/a", "<html></html>".to_string()).await;
    mount_page(&mock_server, "/c", "<html></html>".to_string()).await;

    let seed = format!("{}/", base_url);
    let outcome = crawl(&seed, &crawl_settings(4, Some(1))).await.expect("Crawl failed");

    assert_eq!(
        outcome.site_map[&seed],
        vec![format!("{}/a", base_url), format!("{}/c", base_url)]
    );
    assert!(!outcome.site_map.contains_key("http://other.invalid/b"));
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // A chain: / -> level1 -> level2 -> level3
    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/level1">Level 1</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/level1",
        r#"<html><body><a href="/level2">Level 2</a></body></html>"#.to_string(),
    )
    .await;

    // Level2 is only reachable at depth 2 and must never be fetched
    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><a href="/level3">Level 3</a></body></html>"#),
        )
        .expect(0)
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", base_url);
    let outcome = crawl(&seed, &crawl_settings(4, Some(1))).await.expect("Crawl failed");

    // Only depth 0 and 1 pages appear as keys
    assert_eq!(outcome.site_map.len(), 2);
    assert!(outcome.site_map.contains_key(&seed));
    assert!(outcome.site_map.contains_key(&format!("{}/level1", base_url)));
    assert!(!outcome.site_map.contains_key(&format!("{}/level2", base_url)));

    // level2 is still recorded as level1's child; it was discovered, not fetched
    assert_eq!(
        outcome.site_map[&format!("{}/level1", base_url)],
        vec![format!("{}/level2", base_url)]
    );
}

#[tokio::test]
async fn test_max_threads_does_not_change_results() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
        <a href="/a">a</a><a href="/b">b</a><a href="/c">c</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(&mock_server, "/a", r#"<html><body><a href="/b">b</a></body></html>"#.to_string())
        .await;
    mount_page(&mock_server, "/b", r#"<html><body><a href="/c">c</a></body></html>"#.to_string())
        .await;
    mount_page(&mock_server, "/c", "<html></html>".to_string()).await;

    let seed = format!("{}/", base_url);
    let single = crawl(&seed, &crawl_settings(1, None)).await.expect("Crawl failed");
    let parallel = crawl(&seed, &crawl_settings(4, None)).await.expect("Crawl failed");

    assert_eq!(single.site_map, parallel.site_map);

    let single_keys: std::collections::BTreeSet<_> = single.timestamps.keys().collect();
    let parallel_keys: std::collections::BTreeSet<_> = parallel.timestamps.keys().collect();
    assert_eq!(single_keys, parallel_keys);
}

#[tokio::test]
async fn test_failed_fetches_resolve_with_empty_children() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
        <a href="/missing">missing</a>
        <a href="/broken">broken</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", base_url);
    let outcome = crawl(&seed, &crawl_settings(2, None)).await.expect("Crawl failed");

    // Failed pages are still claimed and recorded, with no children
    assert_eq!(outcome.site_map.len(), 3);
    assert_eq!(outcome.site_map[&format!("{}/missing", base_url)], Vec::<String>::new());
    assert_eq!(outcome.site_map[&format!("{}/broken", base_url)], Vec::<String>::new());
    assert!(outcome.timestamps.contains_key(&format!("{}/missing", base_url)));
}

#[tokio::test]
async fn test_cross_linked_pages_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Every page links to every other page, including back-links
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="/x">x</a><a href="/y">y</a></body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/x"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="/">home</a><a href="/y">y</a></body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/y"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="/">home</a><a href="/x">x</a></body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", base_url);
    let outcome = crawl(&seed, &crawl_settings(4, None)).await.expect("Crawl failed");

    assert_eq!(outcome.site_map.len(), 3);

    // Back-links still appear as children even though their targets were
    // already claimed
    assert_eq!(
        outcome.site_map[&format!("{}/x", base_url)],
        vec![seed.clone(), format!("{}/y", base_url)]
    );
}

#[tokio::test]
async fn test_export_then_import_chain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/a">a</a><a href="/b">b</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/a", "<html></html>".to_string()).await;
    mount_page(&mock_server, "/b", "<html></html>".to_string()).await;

    let seed = format!("{}/", base_url);
    let outcome = crawl(&seed, &crawl_settings(2, None)).await.expect("Crawl failed");

    let dir = tempfile::tempdir().expect("Failed to create tempdir");
    let csv_path = csv_path_for(dir.path(), &seed);
    export_site_map(&outcome, &csv_path).expect("Export failed");

    let db_path = dir.path().join("site_map.db");
    let mut db = SiteDatabase::open(&db_path).expect("Failed to open DB");
    let imported = db.import_site_csv("local_test", &csv_path).expect("Import failed");

    assert_eq!(imported, 3);
    assert_eq!(db.row_count("local_test").expect("Count failed"), Some(3));

    // Rows preserve the crawl's claim order; the seed was claimed first
    let rows = db.site_rows("local_test").expect("Row query failed");
    assert_eq!(rows[0].url, seed);
    assert_eq!(rows[0].num_links, 2);
    assert!(rows.iter().all(|row| row.processing_time >= 0.0));
    assert!(rows
        .iter()
        .all(|row| row.filename == format!("{}_sitemap.txt", netloc(&seed).unwrap())));
}
