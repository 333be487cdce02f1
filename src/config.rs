// src/config.rs
// =============================================================================
// Crawler configuration.
//
// Values are layered:
// 1. Built-in defaults (CrawlConfig::default)
// 2. An optional JSON file passed with --config
// 3. Command-line flags, applied last by main.rs
//
// Every field has a serde default, so a config file only needs to name the
// values it changes:
//
//   { "scope_domain": ".example.edu", "workers": 16 }
// =============================================================================

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SCOPE_DOMAIN: &str = ".ics.uci.edu";
pub const DEFAULT_MAX_SLASHES: usize = 8;
pub const DEFAULT_MAX_DIRECTORY_LEN: usize = 30;
pub const DEFAULT_QUERY_CAP: u32 = 500;
pub const DEFAULT_WORKERS: usize = 8;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
pub const DEFAULT_PROGRESS_INTERVAL_SECS: u64 = 15;
pub const DEFAULT_USER_AGENT: &str = "scope-crawler/0.1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Host suffix a URL must contain to be in scope
    pub scope_domain: String,
    /// A URL with this many '/' characters is rejected
    pub max_slashes: usize,
    /// Longest allowed directory name in a URL path
    pub max_directory_len: usize,
    /// Query variants allowed per base URL
    pub query_cap: u32,
    /// Concurrent fetch-and-extract tasks
    pub workers: usize,
    pub fetch_timeout_secs: u64,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Where the reports and the diagnostic log are written
    pub output_dir: PathBuf,
    pub progress_interval_secs: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            scope_domain: DEFAULT_SCOPE_DOMAIN.to_string(),
            max_slashes: DEFAULT_MAX_SLASHES,
            max_directory_len: DEFAULT_MAX_DIRECTORY_LEN,
            query_cap: DEFAULT_QUERY_CAP,
            workers: DEFAULT_WORKERS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output_dir: PathBuf::from("."),
            progress_interval_secs: DEFAULT_PROGRESS_INTERVAL_SECS,
        }
    }
}

impl CrawlConfig {
    // Loads a config file, falling back to defaults for missing fields
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    // Defaults when no file is given, otherwise the file's contents
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    // Rejects values that would stall or break the crawl
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scope_domain.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "scope_domain",
                reason: "must not be empty".to_string(),
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid {
                field: "workers",
                reason: "at least one worker is required".to_string(),
            });
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "fetch_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_slashes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_slashes",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_secs(self.progress_interval_secs)
    }
}
