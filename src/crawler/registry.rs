//! Visit registry: how many times each page was discovered
//!
//! The registry is the one piece of state every crawl task writes to. The
//! orchestrator keeps it behind a single mutex and calls [`VisitRegistry::admit`]
//! with the lock held, so the duplicate check, increment, budget check and
//! insert happen as one step.

use crate::url::NormalizedUrl;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Result of offering a discovered URL to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First discovery; the page was inserted with count 1 and should be fetched
    Admitted,

    /// Already known; the count was incremented to the contained value
    Duplicate(u32),

    /// New page, but the registry already holds the maximum number of pages
    BudgetExhausted,
}

/// Mapping from normalized URL to discovery count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitRegistry {
    visits: HashMap<NormalizedUrl, u32>,
}

impl VisitRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one discovery of `key`
    ///
    /// Known keys are incremented regardless of the budget. A new key is only
    /// inserted while fewer than `max_pages` keys are present, so the registry
    /// never grows past `max_pages` entries.
    pub fn admit(&mut self, key: NormalizedUrl, max_pages: usize) -> Admission {
        let at_capacity = self.visits.len() >= max_pages;

        match self.visits.entry(key) {
            Entry::Occupied(mut entry) => {
                let count = entry.get_mut();
                *count = count.saturating_add(1);
                Admission::Duplicate(*count)
            }
            Entry::Vacant(_) if at_capacity => Admission::BudgetExhausted,
            Entry::Vacant(entry) => {
                entry.insert(1);
                Admission::Admitted
            }
        }
    }

    /// Returns the discovery count for a normalized key
    pub fn get(&self, key: &str) -> Option<u32> {
        self.visits.get(key).copied()
    }

    /// Returns true if the key has been recorded
    pub fn contains(&self, key: &str) -> bool {
        self.visits.contains_key(key)
    }

    /// Number of distinct pages recorded
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Returns true if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Sum of all discovery counts
    pub fn total_discoveries(&self) -> u64 {
        self.visits.values().map(|&count| u64::from(count)).sum()
    }

    /// Iterates over `(key, count)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&NormalizedUrl, u32)> {
        self.visits.iter().map(|(key, &count)| (key, count))
    }

    /// Returns the entries sorted by count (descending), then by key
    pub fn sorted_by_count(&self) -> Vec<(&NormalizedUrl, u32)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}
