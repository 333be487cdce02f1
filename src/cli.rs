// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - crawl: run a crawl from one or more seed URLs and write the reports
// - check: run the trap filter over a list of URLs without fetching anything
//
// Flags given here override values from --config, which override defaults.
// =============================================================================

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "scope-crawler",
    version = "0.1.0",
    about = "A scoped web crawler with crawler-trap detection",
    long_about = "scope-crawler crawls pages inside one domain, filters links that look like \
                  crawler traps, and writes reports about subdomains, words and traps."
)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by both subcommands
#[derive(Args, Debug, Clone)]
pub struct ScopeArgs {
    /// JSON config file; missing fields use defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Host suffix that keeps a URL in scope (e.g. .ics.uci.edu)
    #[arg(long)]
    pub domain: Option<String>,

    /// Print or write JSON in addition to the text output
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl starting from the given seed URLs
    ///
    /// Example: scope-crawler crawl https://www.ics.uci.edu/ --workers 16
    Crawl {
        /// Seed URLs for the frontier
        #[arg(required = true)]
        seeds: Vec<String>,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Pages fetched at the same time
        #[arg(long)]
        workers: Option<usize>,

        /// Per-page fetch deadline in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Directory for the reports and log.txt
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Check URLs against the trap filter, in order, without fetching
    ///
    /// Example: scope-crawler check http://www.ics.uci.edu/a/a/page.html
    Check {
        /// URLs to validate
        #[arg(required = true)]
        urls: Vec<String>,

        #[command(flatten)]
        scope: ScopeArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crawl_with_overrides() {
        let cli = Cli::parse_from([
            "scope-crawler",
            "crawl",
            "http://www.ics.uci.edu/",
            "--workers",
            "4",
            "--domain",
            ".example.edu",
            "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Crawl { seeds, scope, workers, .. } => {
                assert_eq!(seeds, vec!["http://www.ics.uci.edu/"]);
                assert_eq!(workers, Some(4));
                assert_eq!(scope.domain.as_deref(), Some(".example.edu"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_check_requires_urls() {
        assert!(Cli::try_parse_from(["scope-crawler", "check"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
