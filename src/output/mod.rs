//! Output module for rendering crawl results
//!
//! This module handles:
//! - The plain-text report (pages ordered by how often they are linked)
//! - The JSON report (counts, page records and statistics)

mod report;

pub use report::{write_json_report, write_text_report, JsonReport, PageCount};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
