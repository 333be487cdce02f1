// src/crawl/engine.rs
// =============================================================================
// The crawl loop.
//
// How it works:
// 1. Take URLs from the frontier until `workers` pages are in flight
// 2. Each in-flight page is fetched (with a deadline), classified and parsed
// 3. As each page finishes, its links are validated: valid links the fetcher
//    can serve go back into the frontier, rejected ones are recorded as traps
// 4. Repeat until the frontier is empty and nothing is in flight
//
// All pages run as futures inside one FuturesUnordered, so fetch I/O overlaps
// while every frontier update happens in this loop alone.
//
// Stopping early: once the Shutdown flag is set no new URLs are taken, the
// pages already in flight finish, and the crawl returns normally so the
// reports still get written.
// =============================================================================

use super::diagnostics::DiagnosticLog;
use super::frontier::Frontier;
use crate::analytics::Analytics;
use crate::config::CrawlConfig;
use crate::extract::extract_next_links;
use crate::fetch::{FetchFailure, FetchResult, Fetcher};
use crate::validate::UrlValidator;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Cooperative stop flag, cheap to clone into a signal handler
#[derive(Debug, Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Pages that went through fetch and extraction
    pub pages: usize,
    /// URLs added to the frontier (before its own dedup)
    pub links_queued: usize,
    pub traps: usize,
    pub elapsed: Duration,
}

// What one in-flight page hands back to the loop
struct PageOutcome {
    canonical_url: String,
    links: Vec<String>,
}

pub struct Crawler<F, C> {
    config: CrawlConfig,
    frontier: F,
    fetcher: C,
    validator: UrlValidator,
    analytics: Analytics,
}

impl<F: Frontier, C: Fetcher> Crawler<F, C> {
    // Parameters:
    //   config: limits, scope and output directory for this crawl
    //   frontier: already holding the seed URLs
    //   fetcher: how pages are downloaded (HttpFetcher in the binary)
    pub fn new(config: CrawlConfig, frontier: F, fetcher: C) -> Self {
        let analytics = Analytics::new();
        let validator = UrlValidator::new(&config, analytics.downloads());

        Self {
            config,
            frontier,
            fetcher,
            validator,
            analytics,
        }
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    pub fn frontier(&self) -> &F {
        &self.frontier
    }

    // Runs until the frontier is exhausted or `shutdown` is triggered.
    //
    // Parameters:
    //   shutdown: checked before each new fetch; pages in flight still finish
    //
    // Returns: CrawlSummary with page, link and trap totals
    //
    // The diagnostic log lives exactly as long as this call. The only errors
    // are I/O errors opening or closing it; individual page failures never
    // surface here.
    pub async fn start_crawling(&mut self, shutdown: &Shutdown) -> std::io::Result<CrawlSummary> {
        let diagnostics = DiagnosticLog::open(&self.config.output_dir)?;
        let summary = self.crawl(&diagnostics, shutdown).await;
        diagnostics.close()?;
        Ok(summary)
    }

    async fn crawl(&mut self, diagnostics: &DiagnosticLog, shutdown: &Shutdown) -> CrawlSummary {
        let started = Instant::now();
        let mut last_progress = Instant::now();
        let mut summary = CrawlSummary {
            pages: 0,
            links_queued: 0,
            traps: 0,
            elapsed: Duration::ZERO,
        };

        // Split the borrows: pages in flight read fetcher/analytics while
        // the loop keeps mutating the frontier
        let Self {
            config,
            frontier,
            fetcher,
            validator,
            analytics,
        } = self;
        let fetcher = &*fetcher;
        let analytics = &*analytics;
        let timeout = config.fetch_timeout();

        let mut in_flight = FuturesUnordered::new();

        loop {
            while in_flight.len() < config.workers && !shutdown.is_triggered() {
                let Some(url) = frontier.next_url() else {
                    break;
                };

                if last_progress.elapsed() >= config.progress_interval() {
                    info!(
                        fetched = frontier.fetched_count(),
                        queued = frontier.len(),
                        "crawl progress"
                    );
                    last_progress = Instant::now();
                }

                in_flight.push(process_page(fetcher, analytics, diagnostics, url, timeout));
            }

            // Empty only when nothing is running and nothing new was started
            let Some(page) = in_flight.next().await else {
                break;
            };
            summary.pages += 1;

            let mut out_links = 0;
            for link in &page.links {
                match validator.validate(link) {
                    Ok(()) => {
                        if fetcher.can_fetch(link) {
                            frontier.add_url(link);
                            out_links += 1;
                        }
                    }
                    Err(reason) => {
                        debug!(url = %link, %reason, "identified trap");
                        analytics.record_trap(link, reason);
                    }
                }
            }

            summary.links_queued += out_links;
            analytics.record_outlinks(&page.canonical_url, out_links);
        }

        if shutdown.is_triggered() {
            warn!(queued = frontier.len(), "crawl stopped before the frontier was exhausted");
        }
        info!(
            fetched = frontier.fetched_count(),
            queued = frontier.len(),
            "crawl finished"
        );

        summary.traps = analytics.trap_count();
        summary.elapsed = started.elapsed();
        summary
    }
}

// Fetch, classify and parse one page. Never fails: a timeout, a failed
// fetch or an unparseable body all come back as a page with no links.
async fn process_page<C: Fetcher>(
    fetcher: &C,
    analytics: &Analytics,
    diagnostics: &DiagnosticLog,
    url: String,
    timeout: Duration,
) -> PageOutcome {
    let result = match tokio::time::timeout(timeout, fetcher.fetch_url(&url)).await {
        Ok(result) => result,
        Err(_) => FetchResult::failed(&url, FetchFailure::Timeout),
    };

    if let Some(failure) = &result.failure {
        debug!(url = %url, %failure, "fetch failed");
    }

    let links = match extract_next_links(&result, analytics) {
        Ok(links) => links,
        Err(e) => {
            warn!(url = %result.requested_url, error = %e, "could not parse page");
            diagnostics.record(&result.requested_url, e.kind(), &e);
            Vec::new()
        }
    };

    PageOutcome {
        canonical_url: result.canonical_url().to_string(),
        links,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is FuturesUnordered?
//    - A collection of futures that are all polled together
//    - .next().await hands back whichever one finishes first
//    - Its len() is the number still running, which is how `workers` is
//      enforced without spawning tasks
//
// 2. Why `let Self { config, frontier, .. } = self;`?
//    - In-flight futures borrow `fetcher` and `analytics`
//    - The loop still needs `&mut frontier`
//    - Destructuring gives separate borrows of each field, which the
//      borrow checker accepts; `&mut self` as a whole would not be
//
// 3. What does tokio::time::timeout do?
//    - It races a future against a timer
//    - Ok(value) if the future finished in time, Err(Elapsed) otherwise
//    - The fetch future is dropped on timeout, which cancels it
