//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the state machine each candidate URL moves through
//!   (discovered, rejected, counted, fetched, done, ...)
//! - `CrawlStats`: per-outcome tallies for a whole crawl

mod crawl_stats;
mod page_state;

// Re-export main types
pub use crawl_stats::CrawlStats;
pub use page_state::PageState;
