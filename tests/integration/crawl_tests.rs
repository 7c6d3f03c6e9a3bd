//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use ripple_scout::config::{CrawlerConfig, UserAgentConfig};
use ripple_scout::crawler::{crawl, Coordinator, CrawlOutcome};
use ripple_scout::url::normalize_url;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An HTML 200 response
fn html_page(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

/// A page whose body is just the given anchors
fn links_page(hrefs: &[String]) -> ResponseTemplate {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    html_page(format!("<html><body>{}</body></html>", anchors))
}

/// Registry key for a path on the mock server
fn key(server: &MockServer, path: &str) -> String {
    normalize_url(&format!("{}{}", server.uri(), path))
        .unwrap()
        .into_string()
}

async fn run_crawl(server: &MockServer, max_concurrency: usize, max_pages: usize) -> CrawlOutcome {
    let crawler = CrawlerConfig {
        max_concurrency,
        max_pages,
        request_timeout: 5,
    };
    let user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: None,
    };

    Coordinator::new(&server.uri(), &crawler, &user_agent)
        .expect("Failed to create coordinator")
        .run()
        .await
}

#[tokio::test]
async fn test_trailing_slash_merges_and_off_host_excluded() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&[
            format!("{}/foo", base_url),
            format!("{}/foo/", base_url),
            "http://b.example/".to_string(),
        ]))
        .expect(1)
        .mount(&server)
        .await;

    // Whichever spelling wins the race is the one fetched
    Mock::given(method("GET"))
        .and(path_regex("^/foo/?$"))
        .respond_with(html_page("<html><body><p>No links here.</p></body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = run_crawl(&server, 5, 100).await;
    let visits = &outcome.visits;

    assert_eq!(visits.len(), 2);
    assert_eq!(visits.get(&key(&server, "")), Some(1));
    assert_eq!(visits.get(&key(&server, "/foo")), Some(2));
    assert!(visits.iter().all(|(page, _)| !page.as_str().contains("b.example")));
    assert_eq!(outcome.stats.off_host, 1);
}

#[tokio::test]
async fn test_cycles_terminate_and_count_every_discovery() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&["/a".to_string(), "b".to_string()]))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(links_page(&["/".to_string(), "/b".to_string()]))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page("<html><body>leaf</body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = run_crawl(&server, 3, 100).await;
    let visits = &outcome.visits;

    assert_eq!(visits.len(), 3);
    assert_eq!(visits.get(&key(&server, "/")), Some(2));
    assert_eq!(visits.get(&key(&server, "/a")), Some(1));
    assert_eq!(visits.get(&key(&server, "/b")), Some(2));
    assert_eq!(outcome.stats.crawled, 3);
    assert_eq!(outcome.stats.duplicates, 2);
}

#[tokio::test]
async fn test_dense_graph_fetches_each_page_once() {
    let server = MockServer::start().await;
    let pages = ["/", "/1", "/2", "/3"];
    let hrefs: Vec<String> = pages.iter().map(|p| p.to_string()).collect();

    for page in pages {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(links_page(&hrefs))
            .expect(1)
            .mount(&server)
            .await;
    }

    let outcome = run_crawl(&server, 4, 100).await;
    let visits = &outcome.visits;

    // Seed discovery plus one link from each of the four pages
    assert_eq!(visits.get(&key(&server, "/")), Some(5));
    for page in &pages[1..] {
        assert_eq!(visits.get(&key(&server, page)), Some(4));
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), visits.len());
    assert_eq!(visits.total_discoveries(), outcome.stats.discovered - outcome.stats.off_host);
}

#[tokio::test]
async fn test_http_error_only_drops_its_branch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&["/missing".to_string(), "/ok".to_string()]))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(links_page(&["/ok/child".to_string()]))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok/child"))
        .respond_with(html_page("<html><body>child</body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = run_crawl(&server, 2, 100).await;
    let visits = &outcome.visits;

    assert_eq!(visits.get(&key(&server, "/missing")), Some(1));
    assert_eq!(visits.get(&key(&server, "/ok")), Some(1));
    assert_eq!(visits.get(&key(&server, "/ok/child")), Some(1));
    assert_eq!(outcome.stats.fetch_failed, 1);
    assert_eq!(outcome.stats.crawled, 3);
    assert_eq!(outcome.pages.len(), 3);
}

#[tokio::test]
async fn test_non_html_page_is_counted_but_not_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&["/data.json".to_string()]))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"href": "/never"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = run_crawl(&server, 2, 100).await;

    assert_eq!(outcome.visits.get(&key(&server, "/data.json")), Some(1));
    assert_eq!(outcome.visits.len(), 2);
    assert_eq!(outcome.pages.len(), 1);
    assert_eq!(outcome.stats.fetch_failed, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_page_budget_holds_under_concurrent_discovery() {
    let server = MockServer::start().await;
    let hrefs: Vec<String> = (0..20).map(|i| format!("/p{}", i)).collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&hrefs))
        .mount(&server)
        .await;

    // Every child page links to every other child page
    Mock::given(method("GET"))
        .and(path_regex("^/p[0-9]+$"))
        .respond_with(links_page(&hrefs))
        .mount(&server)
        .await;

    let max_pages = 5;
    let outcome = run_crawl(&server, 8, max_pages).await;
    let visits = &outcome.visits;

    assert_eq!(visits.len(), max_pages);
    assert!(visits.iter().all(|(_, count)| count >= 1));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.len() <= visits.len());
    assert_eq!(outcome.stats.fetches_attempted() as usize, visits.len());
    assert!(outcome.stats.budget_rejected > 0);
}

#[tokio::test]
async fn test_budget_of_one_fetches_only_the_seed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&["/a".to_string(), "/".to_string()]))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = run_crawl(&server, 2, 1).await;

    assert_eq!(outcome.visits.len(), 1);
    assert_eq!(outcome.visits.get(&key(&server, "/")), Some(2));
    assert_eq!(outcome.stats.budget_rejected, 1);
}

#[tokio::test]
async fn test_concurrency_gate_serializes_fetches() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(100);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&[
            "/1".to_string(),
            "/2".to_string(),
            "/3".to_string(),
        ]))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex("^/[0-9]$"))
        .respond_with(html_page("<html></html>").set_delay(delay))
        .mount(&server)
        .await;

    let start = Instant::now();
    let outcome = run_crawl(&server, 1, 100).await;

    assert_eq!(outcome.stats.crawled, 4);
    assert!(start.elapsed() >= delay * 3);
}

#[tokio::test]
async fn test_page_records_capture_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><body>
                <h1>Welcome</h1>
                <p>Intro outside main.</p>
                <main><p>Main intro.</p><img src="/logo.png"></main>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let outcome = run_crawl(&server, 1, 10).await;

    assert_eq!(outcome.pages.len(), 1);
    let record = &outcome.pages[0];
    assert_eq!(record.heading, "Welcome");
    assert_eq!(record.first_paragraph, "Main intro.");
    assert_eq!(record.image_urls, vec![format!("{}/logo.png", server.uri())]);
    assert!(record.outgoing_links.is_empty());
}

#[tokio::test]
async fn test_crawl_entry_point_returns_registry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(links_page(&["/about".to_string()]))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page("<html><body>about</body></html>"))
        .mount(&server)
        .await;

    let visits = crawl(&server.uri(), 2, 10).await.expect("crawl failed");

    assert_eq!(visits.len(), 2);
    assert_eq!(visits.get(&key(&server, "/about")), Some(1));
}

#[tokio::test]
async fn test_unreachable_seed_still_returns_registry() {
    // Bind and drop a listener so the port is known to be closed
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let visits = crawl(&format!("http://{}/", addr), 2, 10)
        .await
        .expect("seed URL is valid");

    assert_eq!(visits.len(), 1);
    assert_eq!(visits.get(&format!("{}", addr)), Some(1));
}
