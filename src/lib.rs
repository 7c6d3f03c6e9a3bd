//! Ripple-Scout: a single-site link mapper
//!
//! This crate crawls one website from a seed URL, following same-host links
//! concurrently and counting how many times each page is referenced.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Ripple-Scout operations
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL '{url}': {message}")]
    Parse { url: String, message: String },

    #[error("Missing host in URL: {0}")]
    MissingHost(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Ways a single page fetch can fail
///
/// None of these abort a crawl; the orchestrator logs them and ends the
/// branch that produced the URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error for {url}: {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Non-HTML response for {url}: {}", content_type.as_deref().unwrap_or("no content-type"))]
    UnsupportedContentType {
        url: String,
        content_type: Option<String>,
    },

    #[error("Concurrency gate closed while fetching {url}")]
    GateClosed { url: String },
}

/// Result type alias for Ripple-Scout operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlOutcome, PageRecord, VisitRegistry};
pub use state::{CrawlStats, PageState};
pub use url::{normalize_url, NormalizedUrl};
