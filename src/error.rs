// src/error.rs
// =============================================================================
// Typed errors used inside the crawler.
//
// The binary entry point (main.rs) works with anyhow::Result, but the
// modules underneath return these enums so callers can tell the cases apart:
// - ExtractError: a page could not be parsed (logged, never fatal)
// - ConfigError: invalid configuration values or an unreadable config file
// - ReportError: the final reports could not be written
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Why a fetched document produced no links.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The body is empty or only whitespace
    #[error("document is empty")]
    EmptyDocument,

    /// The canonical URL cannot be used to resolve relative links
    #[error("invalid base URL '{url}': {source}")]
    InvalidBase {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ExtractError {
    // Short label for the diagnostic log
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::EmptyDocument => "EmptyDocument",
            ExtractError::InvalidBase { .. } => "InvalidBase",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize JSON report: {0}")]
    Json(#[from] serde_json::Error),

    /// The common-words report needs at least one recorded word
    #[error("no words were recorded during the crawl")]
    NoWords,
}
