//! nppa-isbn main entry point
//!
//! This is the command-line interface for the game approval bulletin collector.

use anyhow::Context;
use clap::Parser;
use nppa_isbn::config::{load_config_with_hash, Config};
use nppa_isbn::crawler::{self, CollectMode};
use nppa_isbn::output::{announce, print_statistics, LogNotifier};
use nppa_isbn::storage::{open_storage, persist};
use nppa_isbn::url::Listing;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// nppa-isbn: game approval bulletin collector
///
/// Walks the listings of the five game approval channels, extracts every
/// bulletin's approval table and reports the bulletins that are new or
/// changed since the last run.
#[derive(Parser, Debug)]
#[command(name = "nppa-isbn")]
#[command(version)]
#[command(about = "Collects game approval bulletins", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Walk the full archive; any bulletin error aborts the run
    #[arg(long)]
    full: bool,

    /// Validate config and show the listing pages that would be walked
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config).map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    let mode = if cli.full {
        CollectMode::Full
    } else {
        CollectMode::Incremental
    };

    if cli.dry_run {
        return handle_dry_run(&config, mode);
    }

    handle_collect(&config, mode).await.map_err(|e| {
        tracing::error!("Run failed: {:#}", e);
        e
    })
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("nppa_isbn=info,warn"),
            1 => EnvFilter::new("nppa_isbn=debug,info"),
            2 => EnvFilter::new("nppa_isbn=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: prints the plan without touching the network
fn handle_dry_run(config: &Config, mode: CollectMode) -> anyhow::Result<()> {
    let scheme = config.source.url_scheme()?;
    let budget = config.collector.page_budget(mode);

    println!("=== nppa-isbn Dry Run ===\n");

    println!("Mode: {:?} ({} pages per channel)", mode, budget);
    println!(
        "Fetcher: {} attempts, {}ms retry delay, {}s timeout",
        config.fetcher.max_attempts, config.fetcher.retry_delay_ms, config.fetcher.timeout_secs
    );
    println!("Storage: {:?}", config.storage.backend);

    println!(
        "Channels: {}",
        config
            .collector
            .channels
            .iter()
            .map(|channel| channel.code())
            .collect::<Vec<_>>()
            .join(", ")
    );

    for listing in scheme.listings(&config.collector.channels) {
        match listing {
            Listing::Channel(channel) => println!("\n{} ({}):", channel.chinese_name(), channel),
            Listing::Aggregate => println!("\nAggregate listing:"),
        }
        for page in 0..budget {
            println!("  {}", scheme.listing_url(listing, page)?);
        }
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles a collection run and everything that follows it
async fn handle_collect(config: &Config, mode: CollectMode) -> anyhow::Result<()> {
    let mut storage = open_storage(&config.storage).context("opening storage")?;
    tracing::info!(
        "Starting {:?} run, {} contents stored",
        mode,
        storage.content_count()?
    );

    let report = crawler::collect(config, mode, storage.as_ref()).await?;

    persist(storage.as_mut(), &report.reported).context("persisting reported contents")?;
    print_statistics(&report.stats, report.failures.len());

    for failure in &report.failures {
        match &failure.content_id {
            Some(id) => tracing::warn!("{}/{} skipped: {}", failure.listing, id, failure.error),
            None => tracing::warn!(
                "{} stopped at page {}: {}",
                failure.listing,
                failure.page,
                failure.error
            ),
        }
    }

    if mode == CollectMode::Incremental {
        announce(&config.notification, &report, &mut LogNotifier)
            .context("sending notification")?;
    }

    Ok(())
}
