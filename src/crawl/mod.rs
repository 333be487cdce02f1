// src/crawl/mod.rs
// =============================================================================
// This module runs the crawl.
//
// Features:
// - Breadth-first frontier with dedup-on-add
// - Bounded number of pages fetched concurrently
// - Every fetch carries a deadline; failures just mean "no links"
// - Cooperative shutdown that lets in-flight pages finish
// - Diagnostic log of pages that could not be parsed
//
// Submodules:
// - frontier: the URL queue
// - engine: the crawl loop
// - diagnostics: the log.txt writer
// =============================================================================

mod diagnostics;
mod engine;
mod frontier;

pub use engine::{CrawlSummary, Crawler, Shutdown};
pub use frontier::{Frontier, MemoryFrontier};
