//! Plain-text and JSON rendering of a crawl outcome

use crate::crawler::{CrawlOutcome, PageRecord};
use crate::output::OutputResult;
use crate::state::CrawlStats;
use serde::Serialize;
use std::io::Write;

/// One registry entry in the JSON report
#[derive(Debug, Serialize)]
pub struct PageCount<'a> {
    pub url: &'a str,
    pub count: u32,
}

/// Shape of the JSON report
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub base_url: &'a str,
    pub pages: Vec<PageCount<'a>>,
    pub records: &'a [PageRecord],
    pub stats: &'a CrawlStats,
}

impl<'a> JsonReport<'a> {
    /// Borrows the report data out of a crawl outcome
    pub fn from_outcome(outcome: &'a CrawlOutcome) -> Self {
        Self {
            base_url: outcome.base_url.as_str(),
            pages: outcome
                .visits
                .sorted_by_count()
                .into_iter()
                .map(|(url, count)| PageCount {
                    url: url.as_str(),
                    count,
                })
                .collect(),
            records: &outcome.pages,
            stats: &outcome.stats,
        }
    }
}

/// Writes the human-readable report
///
/// Pages are listed by discovery count, most-linked first; ties are ordered
/// by URL so the output is stable.
pub fn write_text_report<W: Write>(outcome: &CrawlOutcome, out: &mut W) -> OutputResult<()> {
    writeln!(out, "=============================")?;
    writeln!(out, "  REPORT for {}", outcome.base_url)?;
    writeln!(out, "=============================")?;

    for (url, count) in outcome.visits.sorted_by_count() {
        writeln!(out, "Found {} internal links to {}", count, url)?;
    }

    let stats = &outcome.stats;
    writeln!(out)?;
    writeln!(
        out,
        "{} pages recorded, {} crawled, {} failed, {} duplicates, {} off-host, {} over budget",
        outcome.visits.len(),
        stats.crawled,
        stats.fetch_failed,
        stats.duplicates,
        stats.off_host,
        stats.budget_rejected
    )?;

    Ok(())
}

/// Writes the JSON report, pretty-printed
pub fn write_json_report<W: Write>(outcome: &CrawlOutcome, out: &mut W) -> OutputResult<()> {
    serde_json::to_writer_pretty(&mut *out, &JsonReport::from_outcome(outcome))?;
    writeln!(out)?;
    Ok(())
}
