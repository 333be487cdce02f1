// src/fetch/http.rs
// =============================================================================
// The default fetcher: plain HTTP GET requests with reqwest.
//
// Key functionality:
// - One shared Client (connection pooling) with a per-request timeout
// - Follows redirects up to a limit and reports the final URL
// - Turns every reqwest error into a FetchFailure instead of an Err,
//   because one bad page must never stop the crawl
// =============================================================================

use super::{FetchFailure, FetchResult, Fetcher};
use crate::config::CrawlConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;
use url::Url;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.fetch_timeout())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch_url(&self, url: &str) -> FetchResult {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchResult::failed(url, categorize_error(&e)),
        };

        let status = response.status();
        if !status.is_success() {
            debug!(url, status = status.as_u16(), "non-success response");
            return FetchResult::failed(url, FetchFailure::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let was_redirected = was_redirected(url, response.url());

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match response.bytes().await {
            Ok(body) => FetchResult {
                requested_url: url.to_string(),
                final_url,
                was_redirected,
                content_type,
                content: Some(body.to_vec()),
                failure: None,
            },
            Err(e) => FetchResult::failed(url, categorize_error(&e)),
        }
    }
}

// reqwest normalizes URLs, so compare parsed forms rather than raw strings
fn was_redirected(requested: &str, served: &Url) -> bool {
    match Url::parse(requested) {
        Ok(requested) => requested != *served,
        Err(_) => true,
    }
}

// Maps reqwest's error kinds onto our own failure categories
fn categorize_error(error: &reqwest::Error) -> FetchFailure {
    let error_string = error.to_string();

    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_redirect() {
        FetchFailure::TooManyRedirects
    } else if error.is_connect() {
        // Connection errors often mean DNS issues or host unreachable
        if error_string.contains("dns") {
            FetchFailure::Dns
        } else {
            FetchFailure::Connect
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        FetchFailure::Tls
    } else {
        FetchFailure::Other(error_string)
    }
}
