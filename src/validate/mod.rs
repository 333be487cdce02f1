// src/validate/mod.rs
// =============================================================================
// Decides whether a candidate link should be crawled.
//
// Rules run in a fixed order and the first failure wins:
// 1. the URL has too many '/' characters
// 2. a directory is named "files", is too long, or repeats
// 3. too many query-string variants of the same base URL
// 4. a #fragment variant of a page we already have
// 5. wrong scheme, out of scope, or a blocked file extension
//
// Rules 3 and 4 keep state for the whole crawl. Their counters are updated
// as soon as they run, even when rule 5 then rejects the URL. Both updates
// happen inside one lock, so concurrent validations of URLs that share a
// base can never push a count past the cap or record a base twice.
//
// Rules 1, 3 and 4 match on the raw string. A URL the `url` crate can't
// parse still goes through them (rule 2 is skipped, it needs a path) and is
// only rejected as Malformed by rule 5.
//
// Submodules:
// - rules: the individual checks as plain functions
// =============================================================================

mod rules;

use crate::analytics::DownloadLedger;
use crate::config::CrawlConfig;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use url::Url;

/// Which rule rejected a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum TrapReason {
    #[error("not an absolute URL")]
    Malformed,
    #[error("path too deep")]
    TooDeep,
    #[error("'files' directory")]
    FilesDirectory,
    #[error("directory name too long")]
    LongDirectory,
    #[error("repeated directory")]
    RepeatedDirectory,
    #[error("too many query variants")]
    QueryFlood,
    #[error("fragment of a downloaded page")]
    DuplicateFragment,
    #[error("not http or https")]
    Scheme,
    #[error("outside crawl scope")]
    OffScope,
    #[error("blocked file extension")]
    BlockedExtension,
}

pub struct UrlValidator {
    scope_domain: String,
    max_slashes: usize,
    max_directory_len: usize,
    query_cap: u32,
    // base URL -> query variants seen so far
    search_counts: Mutex<HashMap<String, u32>>,
    downloads: Arc<DownloadLedger>,
}

impl UrlValidator {
    pub fn new(config: &CrawlConfig, downloads: Arc<DownloadLedger>) -> Self {
        Self {
            scope_domain: config.scope_domain.clone(),
            max_slashes: config.max_slashes,
            max_directory_len: config.max_directory_len,
            query_cap: config.query_cap,
            search_counts: Mutex::new(HashMap::new()),
            downloads,
        }
    }

    pub fn is_valid(&self, url: &str) -> bool {
        self.validate(url).is_ok()
    }

    // Runs every rule in order
    //
    // Parameters:
    //   url: a candidate link, normally already absolute
    //
    // Returns: Ok(()) to crawl it, or Err with the first rule that failed
    //
    // Rules 3 and 4 update their state as a side effect, so validating the
    // same URL twice can give two different answers.
    pub fn validate(&self, url: &str) -> Result<(), TrapReason> {
        let parsed = Url::parse(url);

        rules::check_depth(url, self.max_slashes)?;
        if let Ok(parsed) = &parsed {
            rules::check_directories(parsed.path(), self.max_directory_len)?;
        }

        if let Some(base) = rules::query_base(url) {
            self.count_query_variant(base)?;
        }

        if let Some(base) = rules::fragment_base(url) {
            // record() is the check and the insert in one step
            if !self.downloads.record(base) {
                return Err(TrapReason::DuplicateFragment);
            }
        }

        let parsed = parsed.map_err(|_| TrapReason::Malformed)?;
        rules::check_scope(&parsed, &self.scope_domain)
    }

    /// True when `url` has a fragment and its base was already downloaded.
    /// Does not record anything.
    pub fn fragment_base_seen(&self, url: &str) -> bool {
        rules::fragment_base(url).is_some_and(|base| self.downloads.contains(base))
    }

    fn count_query_variant(&self, base: &str) -> Result<(), TrapReason> {
        let mut counts = self.search_counts.lock().unwrap_or_else(PoisonError::into_inner);
        let count = counts.entry(base.to_string()).or_insert(0);
        *count = count.saturating_add(1);

        if *count > self.query_cap {
            Err(TrapReason::QueryFlood)
        } else {
            Ok(())
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does validate() take &self and not &mut self?
//    - The counters live behind a Mutex (interior mutability)
//    - Many pages can share one validator and still update the counts
//
// 2. What does unwrap_or_else(PoisonError::into_inner) do?
//    - A Mutex is "poisoned" if a thread panicked while holding it
//    - into_inner() takes the guard anyway; a half-finished count update
//      is still a usable count
//
// 3. Why keep `parsed` as a Result for a while?
//    - Rules 1, 3 and 4 work on the raw string and must run even for a URL
//      that doesn't parse
//    - The `?` that turns the parse error into Malformed comes last
