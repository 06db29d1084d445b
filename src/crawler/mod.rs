//! Crawler module for bulletin fetching and extraction
//!
//! This module contains the core collection logic, including:
//! - HTTP fetching with bad gateway retry
//! - Listing page walking
//! - Detail table extraction
//! - Overall run coordination and delta detection

mod collector;
mod extractor;
mod fetcher;
mod listing;

pub use collector::{CollectMode, CollectReport, Collector, Failure};
pub use extractor::{extract, extract_catalog, extract_items, ExtractError};
pub use fetcher::{build_http_client, FetchError, Fetcher};
pub use listing::{parse_listing, ListingPage, ListingWalker};

use crate::config::Config;
use crate::storage::Baseline;
use crate::IsbnError;

/// Runs a complete collection with the configured channels and budget
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `mode` - Incremental or full archive
/// * `baseline` - Previously stored contents, read only during the run
///
/// # Returns
///
/// * `Ok(CollectReport)` - Delta and statistics of the run
/// * `Err(IsbnError)` - The run was aborted
pub async fn collect<B: Baseline + ?Sized>(
    config: &Config,
    mode: CollectMode,
    baseline: &B,
) -> Result<CollectReport, IsbnError> {
    let collector = Collector::from_config(config)?;
    collector
        .collect(
            &config.collector.channels,
            config.collector.page_budget(mode),
            mode,
            baseline,
        )
        .await
}
