// src/main.rs
// =============================================================================
// This is the entry point of the crawler CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Build the configuration (defaults <- config file <- flags)
// 4. Dispatch to the subcommand handler
// 5. Exit with proper code (0 = success, 1 = rejected URLs in `check`,
//    2 = error)
// =============================================================================

mod analytics;     // src/analytics/ - crawl statistics and reports
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - crawl settings
mod crawl;         // src/crawl/ - frontier and crawl loop
mod error;         // src/error.rs - typed errors
mod extract;       // src/extract/ - page classification and link extraction
mod fetch;         // src/fetch/ - fetching pages
mod validate;      // src/validate/ - trap filter

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ScopeArgs};
use config::CrawlConfig;
use crawl::{Crawler, MemoryFrontier, Shutdown};
use fetch::HttpFetcher;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;
use validate::{TrapReason, UrlValidator};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// warn by default, -v for info, -vv for debug; RUST_LOG wins when set
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Crawl {
            seeds,
            scope,
            workers,
            timeout_secs,
            output_dir,
        } => handle_crawl(seeds, &scope, workers, timeout_secs, output_dir).await,
        Commands::Check { urls, scope } => handle_check(&urls, &scope),
    }
}

// Defaults, then the config file, then the flags shared by every subcommand
fn load_config(scope: &ScopeArgs) -> Result<CrawlConfig> {
    let mut config = CrawlConfig::load(scope.config.as_deref())?;
    if let Some(domain) = &scope.domain {
        config.scope_domain = domain.clone();
    }
    Ok(config)
}

// Handles the 'crawl' subcommand
async fn handle_crawl(
    seeds: Vec<String>,
    scope: &ScopeArgs,
    workers: Option<usize>,
    timeout_secs: Option<u64>,
    output_dir: Option<PathBuf>,
) -> Result<i32> {
    let mut config = load_config(scope)?;
    if let Some(workers) = workers {
        config.workers = workers;
    }
    if let Some(timeout_secs) = timeout_secs {
        config.fetch_timeout_secs = timeout_secs;
    }
    if let Some(output_dir) = output_dir {
        config.output_dir = output_dir;
    }
    config.validate()?;

    for seed in &seeds {
        Url::parse(seed).with_context(|| format!("Invalid seed URL '{}'", seed))?;
    }

    println!("🔍 Crawling {} seed(s) within {}", seeds.len(), config.scope_domain);
    info!(workers = config.workers, timeout_secs = config.fetch_timeout_secs, "starting crawl");

    let fetcher = HttpFetcher::new(&config)?;
    let frontier = MemoryFrontier::with_seeds(&seeds);
    let mut crawler = Crawler::new(config.clone(), frontier, fetcher);

    // Ctrl-C stops new fetches; whatever is in flight finishes first
    let shutdown = Shutdown::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, draining in-flight pages");
            on_signal.trigger();
        }
    });

    let summary = crawler
        .start_crawling(&shutdown)
        .await
        .context("Could not write the diagnostic log")?;

    println!(
        "📄 Processed {} page(s) in {:.1}s, queued {} link(s), identified {} trap(s)",
        summary.pages,
        summary.elapsed.as_secs_f64(),
        summary.links_queued,
        summary.traps
    );

    analytics::write_reports(&crawler.analytics().snapshot(), &config.output_dir, scope.json)
        .context("Could not write reports")?;

    println!("✅ Reports written to {}", config.output_dir.display());
    Ok(0)
}

/// One row of `check` output
#[derive(Debug, Serialize)]
struct CheckResult {
    url: String,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<TrapReason>,
}

// Handles the 'check' subcommand
//
// URLs are validated in order against one validator, so later URLs see the
// query counts and fragment bases recorded by earlier ones, just as in a crawl.
fn handle_check(urls: &[String], scope: &ScopeArgs) -> Result<i32> {
    let config = load_config(scope)?;
    config.validate()?;

    let validator = UrlValidator::new(&config, Arc::new(analytics::DownloadLedger::new()));

    let results: Vec<CheckResult> = urls
        .iter()
        .map(|url| {
            let reason = validator.validate(url).err();
            CheckResult {
                url: url.clone(),
                accepted: reason.is_none(),
                reason,
            }
        })
        .collect();

    print_results(&results, scope.json)?;

    if results.iter().all(|r| r.accepted) {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Prints the results either as a table or JSON
fn print_results(results: &[CheckResult], json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(results)?;
        println!("{}", json_output);
    } else {
        print_table(results);
    }
    Ok(())
}

fn print_table(results: &[CheckResult]) {
    println!("{:<60} {:<12} {:<30}", "URL", "VERDICT", "REASON");
    println!("{}", "=".repeat(102));

    for result in results {
        let verdict = if result.accepted { "✅ CRAWL" } else { "🪤 TRAP" };
        let reason = result.reason.map(|r| r.to_string()).unwrap_or_default();

        // Truncate URL if too long for display
        let url_display = if result.url.chars().count() > 57 {
            format!("{}...", result.url.chars().take(57).collect::<String>())
        } else {
            result.url.clone()
        };

        println!("{:<60} {:<12} {:<30}", url_display, verdict, reason);
    }

    println!();

    let accepted = results.iter().filter(|r| r.accepted).count();
    println!("📊 Summary:");
    println!("   ✅ Crawlable: {}", accepted);
    println!("   🪤 Traps: {}", results.len() - accepted);
    println!("   📋 Total: {}", results.len());
}
