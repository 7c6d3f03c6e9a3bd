//! Ripple-Scout main entry point
//!
//! This is the command-line interface for the Ripple-Scout link mapper.

use anyhow::Context;
use clap::Parser;
use ripple_scout::config::{load_config, validate, Config};
use ripple_scout::crawler::Coordinator;
use ripple_scout::output::{write_json_report, write_text_report};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ripple-Scout: a single-site link mapper
///
/// Ripple-Scout crawls every page reachable on the seed's host and reports
/// how many times each page is linked to.
#[derive(Parser, Debug)]
#[command(name = "ripple-scout")]
#[command(version)]
#[command(about = "A single-site link mapper", long_about = None)]
struct Cli {
    /// Seed URL; only pages on its host are crawled
    #[arg(value_name = "BASE_URL")]
    base_url: String,

    /// Maximum number of pages fetched at once
    #[arg(value_name = "MAX_CONCURRENCY", value_parser = clap::value_parser!(u32).range(1..))]
    max_concurrency: Option<u32>,

    /// Maximum number of distinct pages to record
    #[arg(value_name = "MAX_PAGES", value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: Option<u32>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_settings(&cli)?;

    let coordinator = Coordinator::new(&cli.base_url, &config.crawler, &config.user_agent)
        .with_context(|| format!("Cannot crawl {}", cli.base_url))?;

    tracing::info!("starting crawl of: {}...", cli.base_url);
    let outcome = coordinator.run().await;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        write_json_report(&outcome, &mut out).context("Failed to write report")?;
    } else {
        write_text_report(&outcome, &mut out).context("Failed to write report")?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the report on stdout can be piped.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_scout=info,warn"),
            1 => EnvFilter::new("ripple_scout=debug,info"),
            2 => EnvFilter::new("ripple_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file (if any) and applies command-line overrides
fn load_settings(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(max_concurrency) = cli.max_concurrency {
        config.crawler.max_concurrency = max_concurrency as usize;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages as usize;
    }

    validate(&config).context("Invalid settings")?;
    Ok(config)
}
