//! Incremental collector - main collection orchestration logic
//!
//! This module drives a whole run:
//! - Walking each listing until the not-found sentinel or the page budget;
//!   that is one listing per channel, or the single shared listing whose
//!   entries are filtered down to the configured channels
//! - Skipping stubs the baseline already knows
//! - Hydrating the rest and deciding new/changed versus unchanged
//!
//! Everything happens sequentially: one listing page or detail page is in
//! flight at any time. The baseline is only read; persisting the reported
//! contents is left to the caller once the run has returned.

use crate::channel::Channel;
use crate::config::Config;
use crate::crawler::extractor::extract;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::listing::{ListingPage, ListingWalker};
use crate::output::RunStats;
use crate::record::{Content, ContentStub};
use crate::state::StubOutcome;
use crate::storage::Baseline;
use crate::url::{Listing, UrlScheme};
use crate::IsbnError;
use std::collections::HashSet;

/// How a run treats its budget and content-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectMode {
    /// Short page budget; a failing content is recorded and skipped
    Incremental,
    /// Long page budget; a failing content aborts the run
    Full,
}

impl CollectMode {
    /// Returns true if content-level errors are recorded instead of fatal
    pub fn tolerates_content_errors(&self) -> bool {
        matches!(self, Self::Incremental)
    }
}

/// An error that ended a listing walk or a single stub
#[derive(Debug)]
pub struct Failure {
    /// The walked listing, or the stub's own channel for content failures
    pub listing: Listing,
    pub page: u32,
    /// Set for content-level failures, `None` for page-level ones
    pub content_id: Option<String>,
    pub error: IsbnError,
}

/// Outcome of a collection run
#[derive(Debug, Default)]
pub struct CollectReport {
    /// New or changed contents, in walk order
    pub reported: Vec<Content>,
    pub stats: RunStats,
    pub failures: Vec<Failure>,
}

impl CollectReport {
    /// Returns true if every listing was walked without failure
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sequential collector over the configured URL scheme
pub struct Collector {
    fetcher: Fetcher,
    scheme: UrlScheme,
}

impl Collector {
    pub fn new(fetcher: Fetcher, scheme: UrlScheme) -> Self {
        Self { fetcher, scheme }
    }

    /// Builds the fetcher and URL scheme described by `config`
    pub fn from_config(config: &Config) -> Result<Self, IsbnError> {
        let fetcher = Fetcher::new(&config.user_agent, &config.fetcher)?;
        let scheme = config.source.url_scheme()?;
        Ok(Self::new(fetcher, scheme))
    }

    /// Collects the delta of `channels`
    ///
    /// # State Machine
    ///
    /// Each stub ends in one terminal [`StubOutcome`]:
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | Seen earlier in this run, or known to the baseline | `Skipped` |
    /// | Detail table has no rows | `EmptyDropped` |
    /// | Same items as the baseline's stored version | `Unchanged` |
    /// | Anything else | `Reported` |
    /// | Hydration failed, incremental mode | `Failed` |
    ///
    /// # Errors
    ///
    /// A listing page failure ends that listing's walk and is recorded in the
    /// report. A hydration failure is recorded in incremental mode and
    /// returned as the run's error in full mode. Baseline errors are always
    /// returned.
    pub async fn collect<B: Baseline + ?Sized>(
        &self,
        channels: &[Channel],
        page_budget: u32,
        mode: CollectMode,
        baseline: &B,
    ) -> Result<CollectReport, IsbnError> {
        let walker = ListingWalker::new(&self.fetcher, &self.scheme);
        let mut report = CollectReport::default();
        let mut seen = HashSet::new();

        for listing in self.scheme.listings(channels) {
            match listing {
                Listing::Channel(channel) => tracing::info!(
                    "Collecting {} ({}), up to {} pages",
                    channel,
                    channel.chinese_name(),
                    page_budget
                ),
                Listing::Aggregate => tracing::info!(
                    "Collecting the aggregate listing for {} channels, up to {} pages",
                    channels.len(),
                    page_budget
                ),
            }

            for page in 0..page_budget {
                let stubs = match walker.walk_page(listing, page).await {
                    Ok(ListingPage::NotFound) => {
                        tracing::info!("{} listing ends before page {}", listing, page);
                        break;
                    }
                    Ok(ListingPage::Entries(stubs)) => stubs,
                    Err(error) => {
                        tracing::error!("{} page {} failed: {}", listing, page, error);
                        report.failures.push(Failure {
                            listing,
                            page,
                            content_id: None,
                            error,
                        });
                        break;
                    }
                };

                report.stats.record_page();
                tracing::info!("{} page {}: {} entries", listing, page, stubs.len());

                for stub in stubs {
                    if !channels.contains(&stub.channel) {
                        tracing::debug!("Ignore {} outside the configured channels", stub.url);
                        continue;
                    }

                    let channel = stub.channel;
                    let id = stub.id.clone();
                    let outcome = match self.process_stub(stub, baseline, &mut seen).await {
                        Ok((outcome, content)) => {
                            if let Some(content) = content {
                                report.reported.push(content);
                            }
                            outcome
                        }
                        Err(error @ IsbnError::Storage(_)) => return Err(error),
                        Err(error) if mode.tolerates_content_errors() => {
                            tracing::error!("{}/{} failed: {}", channel, id, error);
                            report.failures.push(Failure {
                                listing: Listing::Channel(channel),
                                page,
                                content_id: Some(id),
                                error,
                            });
                            StubOutcome::Failed
                        }
                        Err(error) => return Err(error),
                    };
                    report.stats.record(outcome);
                }
            }
        }

        tracing::info!(
            "Collection finished: {} reported, {} failures",
            report.reported.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Runs one stub through the state machine
    async fn process_stub<B: Baseline + ?Sized>(
        &self,
        stub: ContentStub,
        baseline: &B,
        seen: &mut HashSet<String>,
    ) -> Result<(StubOutcome, Option<Content>), IsbnError> {
        if !seen.insert(stub.url.clone()) {
            tracing::debug!("Skip {} seen earlier in this run", stub.url);
            return Ok((StubOutcome::Skipped, None));
        }

        if baseline.is_known(&stub)? {
            tracing::debug!("Skip known content '{}'", stub.title);
            return Ok((StubOutcome::Skipped, None));
        }

        let content = self.hydrate(stub.clone()).await?;
        if content.items.is_empty() {
            tracing::info!("Skip empty content '{}'", content.title);
            return Ok((StubOutcome::EmptyDropped, None));
        }

        if let Some(prior) = baseline.prior_version(&stub)? {
            if prior.same_items(&content) {
                tracing::info!("Skip unchanged content '{}'", content.title);
                return Ok((StubOutcome::Unchanged, None));
            }
            tracing::info!(
                "Content '{}' changed: {} -> {} items",
                content.title,
                prior.items.len(),
                content.items.len()
            );
        } else {
            tracing::info!(
                "New content '{}' with {} items",
                content.title,
                content.items.len()
            );
        }

        Ok((StubOutcome::Reported, Some(content)))
    }

    /// Fetches a stub's detail page and extracts its items
    pub async fn hydrate(&self, stub: ContentStub) -> Result<Content, IsbnError> {
        let url = self.scheme.detail_url(&stub.url)?;
        let body = self.fetcher.fetch(&url).await?;

        let channel = stub.channel;
        let content_id = stub.id.clone();
        extract(&body, stub).map_err(|source| IsbnError::Extract {
            channel,
            content_id,
            source,
        })
    }
}
