//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns everything a crawl shares between tasks: the scope
//! (seed, host, limits), the fetcher with its concurrency gate, the visit
//! registry, and the collected page records. Each discovered link becomes its
//! own tokio task holding an `Arc` to the coordinator; a task finishes once
//! every child task it spawned has finished, so awaiting the seed's task
//! awaits the whole crawl.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::parser::{parse_html, PageRecord};
use crate::crawler::registry::{Admission, VisitRegistry};
use crate::state::{CrawlStats, PageState};
use crate::url::{extract_host, is_same_host, normalize_parsed};
use crate::{RippleError, UrlError};
use futures::future::{BoxFuture, FutureExt};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Immutable bounds of one crawl
#[derive(Debug, Clone)]
pub struct CrawlScope {
    /// The seed URL; every relative link is resolved against it
    pub base_url: Url,

    /// Lowercase hostname of the seed; links elsewhere are ignored
    pub base_host: String,

    /// Maximum number of distinct pages recorded
    pub max_pages: usize,
}

impl CrawlScope {
    /// Validates the seed URL and builds the scope
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlScope)` - The seed is an absolute http(s) URL with a host
    /// * `Err(UrlError)` - The seed cannot be crawled
    pub fn new(base_url: &str, max_pages: usize) -> Result<Self, UrlError> {
        let url = Url::parse(base_url).map_err(|e| UrlError::Parse {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        let base_host =
            extract_host(&url).ok_or_else(|| UrlError::MissingHost(base_url.to_string()))?;

        Ok(Self {
            base_url: url,
            base_host,
            max_pages,
        })
    }
}

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// The seed URL
    pub base_url: Url,

    /// Discovery counts for every in-scope page
    pub visits: VisitRegistry,

    /// One record per successfully fetched page, in completion order
    pub pages: Vec<PageRecord>,

    /// Candidate outcome tallies
    pub stats: CrawlStats,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    scope: CrawlScope,
    fetcher: Fetcher,
    registry: Mutex<VisitRegistry>,
    pages: Mutex<Vec<PageRecord>>,
    stats: Mutex<CrawlStats>,
}

/// Locks a mutex, recovering the data if a task panicked while holding it
///
/// Every critical section here is a single map or counter update, so the
/// data behind a poisoned lock is still consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `base_url` - The seed URL
    /// * `crawler` - Concurrency, page budget and timeout
    /// * `user_agent` - Identification sent with every request
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run; no request has been made yet
    /// * `Err(RippleError)` - The seed URL is invalid or the client failed to build
    pub fn new(
        base_url: &str,
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, RippleError> {
        let scope = CrawlScope::new(base_url, crawler.max_pages)?;
        let client = build_http_client(user_agent, crawler)?;
        let fetcher = Fetcher::new(client, crawler.max_concurrency);

        Ok(Self::with_fetcher(scope, fetcher))
    }

    /// Creates a coordinator around an existing fetcher
    ///
    /// The fetcher's gate is the only concurrency limit the crawl observes.
    pub fn with_fetcher(scope: CrawlScope, fetcher: Fetcher) -> Self {
        Self {
            scope,
            fetcher,
            registry: Mutex::new(VisitRegistry::new()),
            pages: Mutex::new(Vec::new()),
            stats: Mutex::new(CrawlStats::new()),
        }
    }

    /// The bounds this coordinator crawls within
    pub fn scope(&self) -> &CrawlScope {
        &self.scope
    }

    /// Runs the crawl to completion
    ///
    /// Individual page failures are logged and never abort the crawl; the
    /// outcome holds whatever was gathered.
    pub async fn run(self) -> CrawlOutcome {
        tracing::info!(
            "Starting crawl of {} (max {} pages, {} concurrent fetches)",
            self.scope.base_url,
            self.scope.max_pages,
            self.fetcher.capacity()
        );
        let start_time = Instant::now();

        let coordinator = Arc::new(self);
        let seed = coordinator.scope.base_url.to_string();
        Arc::clone(&coordinator).visit(seed).await;

        let outcome = CrawlOutcome {
            base_url: coordinator.scope.base_url.clone(),
            visits: std::mem::take(&mut *lock(&coordinator.registry)),
            pages: std::mem::take(&mut *lock(&coordinator.pages)),
            stats: std::mem::take(&mut *lock(&coordinator.stats)),
        };

        tracing::info!(
            "Crawl completed: {} pages recorded, {} fetched, {} failed in {:?}",
            outcome.visits.len(),
            outcome.stats.crawled,
            outcome.stats.fetch_failed,
            start_time.elapsed()
        );

        outcome
    }

    /// Processes one candidate URL as its own task tree
    fn visit(self: Arc<Self>, candidate: String) -> BoxFuture<'static, ()> {
        async move {
            let state = self.process(&candidate).await;
            tracing::debug!("{} -> {}", candidate, state);
            lock(&self.stats).record(state);
        }
        .boxed()
    }

    /// Moves a candidate through the page state machine
    ///
    /// This method:
    /// 1. Drops URLs on other hosts
    /// 2. Counts the discovery and decides whether to fetch
    /// 3. Fetches the page
    /// 4. Extracts links and metadata
    /// 5. Crawls every extracted link concurrently and waits for all of them
    async fn process(self: &Arc<Self>, candidate: &str) -> PageState {
        let mut state = PageState::Discovered;

        let url = match Url::parse(candidate) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("{}: {}", e, candidate);
                return PageState::OffHostRejected;
            }
        };

        if !is_same_host(&url, &self.scope.base_host) {
            return PageState::OffHostRejected;
        }

        let key = match normalize_parsed(&url) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("{}", e);
                return PageState::OffHostRejected;
            }
        };

        let admission = lock(&self.registry).admit(key, self.scope.max_pages);
        match admission {
            Admission::Admitted => {}
            Admission::Duplicate(_) => return PageState::DuplicateCounted,
            Admission::BudgetExhausted => return PageState::BudgetRejected,
        }

        tracing::info!("crawling {}", candidate);
        let html = match self.fetcher.fetch_html(candidate).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("{}", e);
                return PageState::FetchFailed;
            }
        };
        advance(&mut state, PageState::Fetched, candidate);

        let page = parse_html(&html, candidate, &self.scope.base_url);
        let links = page.outgoing_links.clone();
        lock(&self.pages).push(page);
        advance(&mut state, PageState::Extracted, candidate);

        let mut children = JoinSet::new();
        for link in links {
            children.spawn(Arc::clone(self).visit(link));
        }
        advance(&mut state, PageState::Recursing, candidate);

        while let Some(joined) = children.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Crawl task under {} failed: {}", candidate, e);
            }
        }
        advance(&mut state, PageState::Done, candidate);

        state
    }
}

fn advance(state: &mut PageState, next: PageState, url: &str) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal transition {} -> {}",
        state,
        next
    );
    tracing::trace!("{}: {} -> {}", url, state, next);
    *state = next;
}

/// Crawls a site and returns how often each page was discovered
///
/// This is the plain entry point: default user agent and timeout, no page
/// records. Only an invalid seed URL is an error; failures on individual
/// pages are logged and skipped.
///
/// # Example
///
/// ```no_run
/// use ripple_scout::crawler::crawl;
///
/// # async fn example() -> Result<(), ripple_scout::RippleError> {
/// let visits = crawl("https://example.com", 5, 100).await?;
/// for (page, count) in visits.sorted_by_count() {
///     println!("{}: {}", page, count);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    base_url: &str,
    max_concurrency: usize,
    max_pages: usize,
) -> Result<VisitRegistry, RippleError> {
    let crawler = CrawlerConfig {
        max_concurrency,
        max_pages,
        ..CrawlerConfig::default()
    };
    let coordinator = Coordinator::new(base_url, &crawler, &UserAgentConfig::default())?;
    Ok(coordinator.run().await.visits)
}
