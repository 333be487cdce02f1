// src/extract/classify.rs
// =============================================================================
// Decides whether a fetched page is worth parsing.
//
// Only pages whose Content-Type contains "text" are parsed. A failed fetch
// carries no content type, so it lands in the same "no links" bucket as an
// image or a PDF. That is a normal outcome, not an error.
//
// Eligible pages are recorded as downloaded, and their subdomain visit count
// goes up by one.
// =============================================================================

use crate::analytics::Analytics;
use crate::fetch::FetchResult;

// Case-sensitive substring match, so "text/html" and "text/plain" pass
pub fn is_text_content(result: &FetchResult) -> bool {
    result
        .content_type
        .as_deref()
        .is_some_and(|content_type| content_type.contains("text"))
}

// Checks one fetched page and records it as downloaded if it is text
//
// Parameters:
//   result: the fetch result (redirects already followed)
//   analytics: receives the canonical URL and the subdomain visit
//
// Returns: Some(canonical_url) when the page should be parsed, None otherwise
pub fn classify<'a>(result: &'a FetchResult, analytics: &Analytics) -> Option<&'a str> {
    if !is_text_content(result) {
        return None;
    }

    let canonical = result.canonical_url();
    analytics.record_visit(canonical);
    Some(canonical)
}
