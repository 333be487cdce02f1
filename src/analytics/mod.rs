// src/analytics/mod.rs
// =============================================================================
// Crawl-wide analytics.
//
// Everything the crawler learns while it runs lands here:
// - which URLs were downloaded (shared with the validator's fragment check)
// - which URLs were identified as traps, and why
// - how many pages each subdomain served
// - word frequencies and the longest page
// - the page with the most valid out-links
//
// `Analytics` is created once per crawl and shared by reference. Each piece
// of state sits behind a Mutex so the concurrent fetch tasks can record into
// it; every update is a single short critical section.
//
// Submodules:
// - report: writes the final text/JSON reports
// =============================================================================

mod report;

pub use report::write_reports;

use crate::extract::is_stop_word;
use crate::validate::TrapReason;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use url::Url;

// A poisoned lock only means another task panicked mid-update; the counters
// are still usable, so keep going with whatever is there.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The set of downloaded URLs and fragment-stripped bases.
///
/// Shared between the classifier (which records canonical page URLs) and the
/// validator (which rejects a `#fragment` URL whose base is already here).
#[derive(Debug, Default)]
pub struct DownloadLedger {
    urls: Mutex<HashSet<String>>,
}

impl DownloadLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url`; returns false if it was already present
    pub fn record(&self, url: &str) -> bool {
        lock(&self.urls).insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        lock(&self.urls).contains(url)
    }

    fn sorted(&self) -> Vec<String> {
        let mut urls: Vec<String> = lock(&self.urls).iter().cloned().collect();
        urls.sort();
        urls
    }
}

/// A URL paired with a count (words on the page, out-links, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageStat {
    pub url: String,
    pub count: usize,
}

impl PageStat {
    // Replaces the current record only when `count` is strictly larger
    fn offer(&mut self, url: &str, count: usize) -> bool {
        if count > self.count {
            self.url = url.to_string();
            self.count = count;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrapRecord {
    pub url: String,
    pub reason: TrapReason,
}

#[derive(Debug, Default)]
struct PageTotals {
    subdomains: HashMap<String, u64>,
    words: HashMap<String, u64>,
    most_words: PageStat,
    most_outlinks: PageStat,
}

#[derive(Debug, Default)]
pub struct Analytics {
    downloads: Arc<DownloadLedger>,
    traps: Mutex<HashMap<String, TrapReason>>,
    totals: Mutex<PageTotals>,
}

impl Analytics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the download ledger, for the validator
    pub fn downloads(&self) -> Arc<DownloadLedger> {
        Arc::clone(&self.downloads)
    }

    // Called once per text page: remembers the URL and bumps its subdomain
    pub fn record_visit(&self, canonical_url: &str) {
        self.downloads.record(canonical_url);

        if let Some(netloc) = network_location(canonical_url) {
            *lock(&self.totals).subdomains.entry(netloc).or_insert(0) += 1;
        }
    }

    // Tracks the longest page and counts every non-stop-word token
    pub fn record_words(&self, canonical_url: &str, tokens: &[String]) {
        let mut totals = lock(&self.totals);
        totals.most_words.offer(canonical_url, tokens.len());

        for token in tokens.iter().filter(|t| !is_stop_word(t)) {
            *totals.words.entry(token.clone()).or_insert(0) += 1;
        }
    }

    pub fn record_outlinks(&self, canonical_url: &str, count: usize) {
        lock(&self.totals).most_outlinks.offer(canonical_url, count);
    }

    // The first reason a URL was rejected is the one kept
    pub fn record_trap(&self, url: &str, reason: TrapReason) {
        lock(&self.traps).entry(url.to_string()).or_insert(reason);
    }

    pub fn trap_count(&self) -> usize {
        lock(&self.traps).len()
    }

    /// Copies the current state into a plain, sorted value for reporting
    pub fn snapshot(&self) -> AnalyticsSnapshot {
        let mut identified_traps: Vec<TrapRecord> = lock(&self.traps)
            .iter()
            .map(|(url, reason)| TrapRecord {
                url: url.clone(),
                reason: *reason,
            })
            .collect();
        identified_traps.sort_by(|a, b| a.url.cmp(&b.url));

        let totals = lock(&self.totals);

        AnalyticsSnapshot {
            downloaded_urls: self.downloads.sorted(),
            identified_traps,
            subdomains: sorted_by_count(&totals.subdomains),
            most_words: totals.most_words.clone(),
            most_outlinks: totals.most_outlinks.clone(),
            word_frequencies: sorted_by_count(&totals.words),
        }
    }
}

/// Everything the reports need, detached from the locks
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalyticsSnapshot {
    pub downloaded_urls: Vec<String>,
    pub identified_traps: Vec<TrapRecord>,
    /// (subdomain, pages) by descending count
    pub subdomains: Vec<(String, u64)>,
    pub most_words: PageStat,
    pub most_outlinks: PageStat,
    /// (word, frequency) by descending frequency
    pub word_frequencies: Vec<(String, u64)>,
}

// Descending by count, ties broken alphabetically so reports are stable
fn sorted_by_count(counts: &HashMap<String, u64>) -> Vec<(String, u64)> {
    let mut pairs: Vec<(String, u64)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs
}

// host[:port], the part of the URL between "//" and the path
fn network_location(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_visit_counts_subdomains() {
        let analytics = Analytics::new();
        analytics.record_visit("http://www.ics.uci.edu/a");
        analytics.record_visit("http://www.ics.uci.edu/b");
        analytics.record_visit("http://vision.ics.uci.edu:8080/");

        let snapshot = analytics.snapshot();
        assert_eq!(
            snapshot.subdomains,
            vec![
                ("www.ics.uci.edu".to_string(), 2),
                ("vision.ics.uci.edu:8080".to_string(), 1),
            ]
        );
        assert_eq!(snapshot.downloaded_urls.len(), 3);
    }

    #[test]
    fn test_visit_with_unparseable_url_still_recorded() {
        let analytics = Analytics::new();
        analytics.record_visit("not a url");
        let snapshot = analytics.snapshot();
        assert_eq!(snapshot.downloaded_urls, vec!["not a url".to_string()]);
        assert!(snapshot.subdomains.is_empty());
    }

    #[test]
    fn test_words_skip_stop_words_but_count_toward_length() {
        let analytics = Analytics::new();
        analytics.record_words("http://a.ics.uci.edu/", &tokens(&["the", "crawler", "the", "crawler", "ran"]));

        let snapshot = analytics.snapshot();
        assert_eq!(snapshot.most_words.count, 5);
        assert_eq!(
            snapshot.word_frequencies,
            vec![("crawler".to_string(), 2), ("ran".to_string(), 1)]
        );
    }

    #[test]
    fn test_longest_page_needs_strictly_more_words() {
        let analytics = Analytics::new();
        analytics.record_words("http://a.ics.uci.edu/first", &tokens(&["one", "two"]));
        analytics.record_words("http://a.ics.uci.edu/second", &tokens(&["three", "four"]));
        assert_eq!(analytics.snapshot().most_words.url, "http://a.ics.uci.edu/first");
    }

    #[test]
    fn test_outlinks_keep_maximum() {
        let analytics = Analytics::new();
        analytics.record_outlinks("http://a.ics.uci.edu/x", 3);
        analytics.record_outlinks("http://a.ics.uci.edu/y", 7);
        analytics.record_outlinks("http://a.ics.uci.edu/z", 5);
        assert_eq!(
            analytics.snapshot().most_outlinks,
            PageStat {
                url: "http://a.ics.uci.edu/y".to_string(),
                count: 7
            }
        );
    }

    #[test]
    fn test_trap_keeps_first_reason() {
        let analytics = Analytics::new();
        analytics.record_trap("http://example.com/", TrapReason::OffScope);
        analytics.record_trap("http://example.com/", TrapReason::TooDeep);
        assert_eq!(analytics.trap_count(), 1);
        assert_eq!(analytics.snapshot().identified_traps[0].reason, TrapReason::OffScope);
    }

    #[test]
    fn test_ledger_is_shared() {
        let analytics = Analytics::new();
        let ledger = analytics.downloads();
        analytics.record_visit("http://a.ics.uci.edu/page");
        assert!(ledger.contains("http://a.ics.uci.edu/page"));
        assert!(!ledger.record("http://a.ics.uci.edu/page"));
    }
}
