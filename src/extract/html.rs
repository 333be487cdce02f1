// src/extract/html.rs
// =============================================================================
// This module pulls links and text out of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM, recovering from malformed markup the way a
//   browser does (unclosed tags, stray entities, missing <html>/<body>)
// - Supports CSS selectors for finding elements
//
// And the `url` crate to resolve relative hrefs against the page URL:
//
//   base = "http://a.ics.uci.edu/x/y", href = "../z"
//   result = "http://a.ics.uci.edu/z"
//
// Bodies are decoded leniently: bytes that aren't UTF-8 become U+FFFD, so a
// latin-1 page keeps its links and most of its words. html5ever never
// rejects markup either, so the only ways parsing "fails" are a body with
// nothing in it or a page URL that can't act as a base for relative links.
// =============================================================================

use super::tokenize::tokenize;
use crate::error::ExtractError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

// Elements whose text never shows up on the rendered page
const INVISIBLE: &[&str] = &["script", "style", "noscript", "template"];

// Elements that start a new line (or cell) when rendered. Text on either
// side of one is two separate words; text around inline markup like <b> or
// <a> is not.
const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "caption", "dd", "details", "div",
    "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "li", "main", "nav", "ol", "option", "p", "pre", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "ul",
];

/// Links and word tokens from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Absolute URLs, in document order, duplicates kept
    pub links: Vec<String>,
    pub tokens: Vec<String>,
}

// Parses one page body into its links and word tokens
//
// Parameters:
//   content: the raw response body (any encoding; invalid UTF-8 is replaced)
//   base_url: the page's canonical URL, used to resolve relative hrefs
//
// Returns: ParsedPage, or ExtractError for an empty body or an unusable base
//
// Example:
//   content = "<p>Hel<b>lo</b></p><a href='../z'>next</a>"
//   base_url = "http://a.ics.uci.edu/x/y"
//   result.links = ["http://a.ics.uci.edu/z"], result.tokens = ["hello", "next"]
pub fn parse_page(content: &[u8], base_url: &str) -> Result<ParsedPage, ExtractError> {
    let html = String::from_utf8_lossy(content);
    if html.trim().is_empty() {
        return Err(ExtractError::EmptyDocument);
    }

    let base = Url::parse(base_url).map_err(|source| ExtractError::InvalidBase {
        url: base_url.to_string(),
        source,
    })?;

    let document = Html::parse_document(&html);

    Ok(ParsedPage {
        links: extract_html_links(&document, &base),
        tokens: tokenize(&visible_text(&document)),
    })
}

// Every <a href> in the page except pure "#fragment" links, made absolute
//
// Parameters:
//   document: the parsed page
//   base: the page URL that relative hrefs are resolved against
//
// Returns: absolute URLs in document order, duplicates kept
pub fn extract_html_links(document: &Html, base: &Url) -> Vec<String> {
    // "a[href]" is a constant, known-valid selector
    let selector = Selector::parse("a[href]").unwrap();

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(base, href))
        .collect()
}

// Resolves an href against the page URL
//
// Returns None for in-page anchors and for hrefs that can't be joined
// (e.g. "http://[bad"). Absolute hrefs come back as-is, normalized.
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    if href.starts_with('#') {
        return None;
    }

    base.join(href).ok().map(|url| url.to_string())
}

// Text a reader would see. Inline markup is concatenated as-is, so
// "Hel<b>lo</b>" reads "Hello"; block elements add a space on each side.
fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    collect_text(document.root_element(), &mut text);
    text
}

fn collect_text(element: ElementRef<'_>, text: &mut String) {
    for child in element.children() {
        if let Some(chunk) = child.value().as_text() {
            text.push_str(chunk);
            continue;
        }

        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child.value().name();
        if INVISIBLE.contains(&name) {
            continue;
        }

        let block = BLOCKS.contains(&name);
        if block {
            text.push(' ');
        }
        collect_text(child, text);
        if block {
            text.push(' ');
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why String::from_utf8_lossy?
//    - Web pages are not always UTF-8 (latin-1 and windows-1252 are common)
//    - from_utf8_lossy swaps each bad byte for U+FFFD instead of failing
//    - It returns Cow<str>: borrowed when the bytes were already valid,
//      owned only when something had to be replaced
//
// 2. What is ElementRef::wrap?
//    - element.children() yields every kind of node (text, comments, elements)
//    - wrap() turns a node into an ElementRef only if it is an element
//    - Text nodes are handled with node.value().as_text() instead
//
// 3. Why recurse instead of using descendants()?
//    - A flat walk can't tell where an element ends
//    - Recursing lets us add a space both before and after a block element

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://a.ics.uci.edu/x/y";

    fn links(html: &str) -> Vec<String> {
        parse_page(html.as_bytes(), BASE).unwrap().links
    }

    #[test]
    fn test_resolve_parent_relative_link() {
        assert_eq!(links(r#"<a href="../z">Z</a>"#), vec!["http://a.ics.uci.edu/z"]);
    }

    #[test]
    fn test_resolve_scheme_relative_link() {
        assert_eq!(
            links(r#"<a href="//b.ics.uci.edu/p">B</a>"#),
            vec!["http://b.ics.uci.edu/p"]
        );
    }

    #[test]
    fn test_absolute_link_kept() {
        assert_eq!(
            links(r#"<a href="https://www.rust-lang.org">Rust</a>"#),
            vec!["https://www.rust-lang.org/"]
        );
    }

    #[test]
    fn test_fragment_only_links_dropped_order_kept() {
        let html = r##"
            <a href="/one">1</a>
            <a href="#top">top</a>
            <a href="two.html">2</a>
            <a href="#">empty anchor</a>
            <a href="three#part">3</a>
        "##;
        assert_eq!(
            links(html),
            vec![
                "http://a.ics.uci.edu/one",
                "http://a.ics.uci.edu/x/two.html",
                "http://a.ics.uci.edu/x/three#part",
            ]
        );
    }

    #[test]
    fn test_empty_href_resolves_to_page() {
        assert_eq!(links(r#"<a href="">self</a>"#), vec![BASE]);
    }

    #[test]
    fn test_duplicates_kept() {
        let html = r#"<a href="/p">1</a><a href="/p">2</a>"#;
        assert_eq!(links(html).len(), 2);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        assert!(links(r#"<a name="x">no link</a>"#).is_empty());
    }

    #[test]
    fn test_malformed_markup_still_parsed() {
        let html = r#"<html><body><div><a href="/ok">ok &bogus;</a><p>unclosed <a href='/also'>also"#;
        assert_eq!(
            links(html),
            vec!["http://a.ics.uci.edu/ok", "http://a.ics.uci.edu/also"]
        );
    }

    #[test]
    fn test_empty_document_is_error() {
        assert!(matches!(parse_page(b"", BASE), Err(ExtractError::EmptyDocument)));
        assert!(matches!(parse_page(b"  \n ", BASE), Err(ExtractError::EmptyDocument)));
    }

    #[test]
    fn test_latin1_body_keeps_links() {
        // "caf\xe9" is latin-1 for "café"
        let page = parse_page(b"<a href=\"/x\">caf\xe9</a> <a href=\"/y\">y</a>", BASE).unwrap();
        assert_eq!(page.links, vec!["http://a.ics.uci.edu/x", "http://a.ics.uci.edu/y"]);
        assert_eq!(page.tokens, vec!["caf", "y"]);
    }

    #[test]
    fn test_bad_base_is_error() {
        assert!(matches!(
            parse_page(b"<a href='/x'>x</a>", "not a url"),
            Err(ExtractError::InvalidBase { .. })
        ));
    }

    #[test]
    fn test_tokens_skip_scripts_and_split_elements() {
        let html = r#"
            <html><head><title>Home</title><script>var hidden = 1;</script>
            <style>body { color: red }</style></head>
            <body><p>Hello,</p><p>World!</p></body></html>
        "#;
        let page = parse_page(html.as_bytes(), BASE).unwrap();
        assert_eq!(page.tokens, vec!["home", "hello", "world"]);
    }

    #[test]
    fn test_inline_markup_does_not_split_words() {
        let page = parse_page(b"<p>Hel<b>lo</b> <a href='/a'>Crawl</a>ing</p>", BASE).unwrap();
        assert_eq!(page.tokens, vec!["hello", "crawling"]);
        assert_eq!(page.links, vec!["http://a.ics.uci.edu/a"]);
    }

    #[test]
    fn test_block_elements_separate_words() {
        let html = "<ul><li>one</li><li>two</li></ul><div>three<br>four</div><table><tr><td>five</td><td>six</td></tr></table>";
        let page = parse_page(html.as_bytes(), BASE).unwrap();
        assert_eq!(page.tokens, vec!["one", "two", "three", "four", "five", "six"]);
    }
}
