//! Candidate state definitions for tracking crawl progress
//!
//! Every URL handed to the orchestrator starts out `Discovered` and ends in
//! exactly one terminal state.

use serde::Serialize;
use std::fmt;

/// Represents the current state of a candidate URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    // ===== Active States =====
    /// URL was found on a page (or is the seed) and has not been checked yet
    Discovered,

    /// Page body was fetched successfully
    Fetched,

    /// Links and metadata were extracted from the page
    Extracted,

    /// Child candidates are being crawled
    Recursing,

    // ===== Terminal Success States =====
    /// Page and every branch below it finished
    Done,

    // ===== Terminal Skip States =====
    /// URL points at a different host than the seed
    OffHostRejected,

    /// URL was already in the registry; its count was incremented
    DuplicateCounted,

    /// Registry is full; the new URL was not admitted
    BudgetRejected,

    // ===== Terminal Error States =====
    /// Network, HTTP status or content-type failure
    FetchFailed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if this is an active state (page may still be processed)
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Discovered | Self::Fetched | Self::Extracted | Self::Recursing
        )
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: PageState) -> bool {
        match self {
            Self::Discovered => matches!(
                next,
                Self::OffHostRejected
                    | Self::DuplicateCounted
                    | Self::BudgetRejected
                    | Self::FetchFailed
                    | Self::Fetched
            ),
            Self::Fetched => next == Self::Extracted,
            Self::Extracted => next == Self::Recursing,
            Self::Recursing => next == Self::Done,
            _ => false,
        }
    }

    /// Short lowercase label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Fetched => "fetched",
            Self::Extracted => "extracted",
            Self::Recursing => "recursing",
            Self::Done => "done",
            Self::OffHostRejected => "off_host",
            Self::DuplicateCounted => "duplicate",
            Self::BudgetRejected => "budget_rejected",
            Self::FetchFailed => "fetch_failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
