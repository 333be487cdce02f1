// src/extract/mod.rs
// =============================================================================
// This module turns a fetched page into a list of candidate links.
//
// Steps, in order:
// 1. classify: is this a text page? (if not, there are no links)
// 2. html: parse the body, resolve hrefs, collect visible text
// 3. tokenize: split the text into words for the analytics
//
// Links come back unvalidated and possibly duplicated; the validator and the
// frontier deal with those.
// =============================================================================

mod classify;
mod html;
mod tokenize;

pub use classify::classify;
pub use tokenize::is_stop_word;

use html::parse_page;

use crate::analytics::Analytics;
use crate::error::ExtractError;
use crate::fetch::FetchResult;

// The outbound links of one fetched page.
//
// Parameters:
//   result: what the fetcher returned for the page
//   analytics: where the visit and the page's words are recorded
//
// Returns: absolute URLs in document order (unvalidated, duplicates kept)
//
// Non-text pages give Ok(empty). A text page that can't be parsed gives an
// ExtractError; the page still counts as downloaded, but has no links and no
// words. A parsed page's words are recorded before the links are returned.
pub fn extract_next_links(result: &FetchResult, analytics: &Analytics) -> Result<Vec<String>, ExtractError> {
    let Some(canonical) = classify(result, analytics) else {
        return Ok(Vec::new());
    };

    let content = result.content.as_deref().unwrap_or_default();
    let page = parse_page(content, canonical)?;

    analytics.record_words(canonical, &page.tokens);
    Ok(page.links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_text_yields_nothing() {
        let analytics = Analytics::new();
        let result = FetchResult::page(
            "http://a.ics.uci.edu/doc",
            "application/pdf",
            r#"<a href="/looks-like-html">x</a>"#,
        );
        assert!(extract_next_links(&result, &analytics).unwrap().is_empty());
        assert!(analytics.snapshot().downloaded_urls.is_empty());
    }

    #[test]
    fn test_text_page_links_and_words() {
        let analytics = Analytics::new();
        let result = FetchResult::page(
            "http://a.ics.uci.edu/x/y",
            "text/html",
            r##"<p>Crawlers crawl the web</p><a href="../z">next</a> <a href="#s">skip</a>"##,
        );

        let links = extract_next_links(&result, &analytics).unwrap();
        assert_eq!(links, vec!["http://a.ics.uci.edu/z"]);

        let snapshot = analytics.snapshot();
        assert_eq!(snapshot.downloaded_urls, vec!["http://a.ics.uci.edu/x/y".to_string()]);
        // crawlers, crawl, the, web, next, skip
        assert_eq!(snapshot.most_words.count, 6);
        assert!(!snapshot.word_frequencies.iter().any(|(w, _)| w == "the"));
    }

    #[test]
    fn test_unparseable_text_page_still_downloaded() {
        let analytics = Analytics::new();
        let result = FetchResult::page("http://a.ics.uci.edu/empty", "text/html", "");

        assert!(matches!(
            extract_next_links(&result, &analytics),
            Err(ExtractError::EmptyDocument)
        ));
        let snapshot = analytics.snapshot();
        assert_eq!(snapshot.downloaded_urls.len(), 1);
        assert_eq!(snapshot.most_words.count, 0);
    }
}
