use crate::state::PageState;
use serde::Serialize;

/// Tallies of candidate outcomes over one crawl
///
/// Every candidate the orchestrator sees is counted once in `discovered` and
/// once in the bucket of the terminal state it reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Candidates seen, including the seed and off-host links
    pub discovered: u64,

    /// Pages fetched, extracted and recursed into
    pub crawled: u64,

    /// Links pointing at another host
    pub off_host: u64,

    /// Re-discoveries of a page already in the registry
    pub duplicates: u64,

    /// New pages turned away because the page budget was spent
    pub budget_rejected: u64,

    /// Pages whose fetch failed
    pub fetch_failed: u64,
}

impl CrawlStats {
    /// Creates an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the terminal state a candidate reached
    ///
    /// Active states are ignored; a candidate is counted when it finishes.
    pub fn record(&mut self, state: PageState) {
        if !state.is_terminal() {
            return;
        }

        self.discovered += 1;
        match state {
            PageState::Done => self.crawled += 1,
            PageState::OffHostRejected => self.off_host += 1,
            PageState::DuplicateCounted => self.duplicates += 1,
            PageState::BudgetRejected => self.budget_rejected += 1,
            PageState::FetchFailed => self.fetch_failed += 1,
            PageState::Discovered
            | PageState::Fetched
            | PageState::Extracted
            | PageState::Recursing => {}
        }
    }

    /// Number of GET requests issued (successful or not)
    pub fn fetches_attempted(&self) -> u64 {
        self.crawled + self.fetch_failed
    }
}
