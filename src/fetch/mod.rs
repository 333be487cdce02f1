// src/fetch/mod.rs
// =============================================================================
// This module defines how pages get fetched.
//
// The crawler itself never talks to the network directly. It asks a
// `Fetcher` for a `FetchResult` and works from that record alone, so the
// HTTP implementation can be swapped for an on-disk corpus or a test double.
//
// Submodules:
// - http: the default reqwest-backed fetcher
// =============================================================================

mod http;

pub use http::HttpFetcher;

use std::fmt;

/// Why a fetch produced no content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Request (or the crawler's own deadline) timed out
    Timeout,
    /// Redirect chain was too long or looped
    TooManyRedirects,
    /// Could not connect to the host
    Connect,
    /// Could not resolve the hostname
    Dns,
    /// SSL/TLS handshake or certificate error
    Tls,
    /// Server answered with a non-success status
    Status(u16),
    /// Anything else
    Other(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Timeout => write!(f, "request timed out"),
            FetchFailure::TooManyRedirects => write!(f, "too many redirects"),
            FetchFailure::Connect => write!(f, "connection failed"),
            FetchFailure::Dns => write!(f, "could not resolve hostname"),
            FetchFailure::Tls => write!(f, "SSL certificate error"),
            FetchFailure::Status(code) => write!(f, "HTTP {}", code),
            FetchFailure::Other(message) => write!(f, "{}", message),
        }
    }
}

// One fetched page, exactly as the fetcher saw it.
//
// A failed fetch is still a FetchResult: it has no content type and no
// content, and `failure` says what went wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResult {
    /// The URL the crawler asked for
    pub requested_url: String,
    /// The URL the content was served from after redirects
    pub final_url: String,
    pub was_redirected: bool,
    /// Raw Content-Type header value, if any
    pub content_type: Option<String>,
    pub content: Option<Vec<u8>>,
    pub failure: Option<FetchFailure>,
}

impl FetchResult {
    // A successful, non-redirected fetch
    #[cfg(test)]
    pub fn page(url: &str, content_type: &str, content: impl Into<Vec<u8>>) -> Self {
        Self {
            requested_url: url.to_string(),
            final_url: url.to_string(),
            was_redirected: false,
            content_type: Some(content_type.to_string()),
            content: Some(content.into()),
            failure: None,
        }
    }

    pub fn failed(url: &str, failure: FetchFailure) -> Self {
        Self {
            requested_url: url.to_string(),
            final_url: url.to_string(),
            failure: Some(failure),
            ..Default::default()
        }
    }

    /// The identity of the page: the post-redirect URL when a redirect happened
    pub fn canonical_url(&self) -> &str {
        if self.was_redirected {
            &self.final_url
        } else {
            &self.requested_url
        }
    }
}

// The corpus collaborator.
//
// `fetch_url` never fails: network problems come back as a FetchResult with
// `failure` set. `can_fetch` tells the crawler whether a URL is something
// this corpus can serve at all; links it can't serve are not queued.
pub trait Fetcher {
    async fn fetch_url(&self, url: &str) -> FetchResult;

    fn can_fetch(&self, _url: &str) -> bool {
        true
    }
}
