//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Bounding the number of requests in flight with a shared gate
//! - GET requests to fetch page content
//! - Status and Content-Type validation

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::FetchError;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Crawler settings (request timeout)
///
/// # Example
///
/// ```no_run
/// use ripple_scout::config::Config;
/// use ripple_scout::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches HTML pages under a shared concurrency gate
///
/// Cloning a `Fetcher` shares both the HTTP connection pool and the gate, so
/// the in-flight limit holds across every clone.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    gate: Arc<Semaphore>,
    capacity: usize,
}

impl Fetcher {
    /// Creates a fetcher allowing at most `max_concurrency` requests in flight
    pub fn new(client: Client, max_concurrency: usize) -> Self {
        let capacity = max_concurrency.clamp(1, Semaphore::MAX_PERMITS);

        Self {
            client,
            gate: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Maximum number of requests this fetcher keeps in flight
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of gate slots currently free
    pub fn available_slots(&self) -> usize {
        self.gate.available_permits()
    }

    /// Fetches a page and returns its body if it is an HTML document
    ///
    /// # Request Flow
    ///
    /// 1. Wait for a gate slot; it is held until this call returns
    /// 2. Send the GET request
    /// 3. Check the response
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Transport failure (DNS, refused, timeout) | `Network` |
    /// | Status >= 400 | `HttpStatus` |
    /// | Content-Type missing or not `text/html` | `UnsupportedContentType` |
    /// | Body cannot be read | `Network` |
    /// | Otherwise | body text |
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| FetchError::GateClosed {
                url: url.to_string(),
            })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let content_type = content_type_of(response.headers());

        if !content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"))
        {
            return Err(FetchError::UnsupportedContentType {
                url: url.to_string(),
                content_type,
            });
        }

        response.text().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })
    }
}

/// The raw `Content-Type` value; non-UTF-8 bytes are replaced, not dropped
fn content_type_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}
