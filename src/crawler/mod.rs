//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching under a concurrency gate
//! - HTML parsing and link extraction
//! - The visit registry that deduplicates and counts pages
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod registry;

pub use coordinator::{crawl, Coordinator, CrawlOutcome, CrawlScope};
pub use fetcher::{build_http_client, Fetcher};
pub use parser::{extract_images, extract_links, parse_html, PageRecord};
pub use registry::{Admission, VisitRegistry};
