//! Paginated collection harvester
//!
//! This module follows the registry's `next` cursor page by page and
//! accumulates normalized rows, including:
//! - A lazy page sequence with an explicit termination check
//! - Truncation on failed pages without discarding collected rows
//! - The registry total-count query

mod count;
mod pages;
mod state;

pub use count::total_count;
pub use pages::{HarvestedPage, PageStream};
pub use state::{HarvestState, StopReason};

use crate::client::Fetcher;
use crate::config::RegistryConfig;
use crate::registry::CollectionTable;
use crate::HarvestError;
use std::time::Duration;

/// What to harvest and how far
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Base URL of the registry listing endpoint
    pub api_url: String,

    /// Topic filter
    pub topic: String,

    /// Timeout for each page request
    pub page_timeout: Duration,

    /// Optional cap on page requests; `None` follows the cursor to the end
    pub max_pages: Option<u32>,
}

impl HarvestOptions {
    pub fn new(api_url: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            topic: topic.into(),
            page_timeout: Duration::from_secs(2),
            max_pages: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(&config.api_url, &config.topic)
            .with_page_timeout(config.page_timeout())
            .with_max_pages(config.max_pages)
    }
}

/// A finished harvest
#[derive(Debug, Clone)]
pub struct HarvestOutcome {
    /// All rows collected, in arrival order
    pub table: CollectionTable,

    /// Number of page requests issued (including a final failed one)
    pub pages_requested: u32,

    /// Total reported by the first page, if any
    pub reported_count: Option<u64>,

    /// Why the harvest ended
    pub stop: StopReason,
}

impl HarvestOutcome {
    pub fn into_table(self) -> CollectionTable {
        self.table
    }
}

/// Drives a [`PageStream`] to completion
pub struct Harvester<'a> {
    fetcher: &'a dyn Fetcher,
    options: HarvestOptions,
}

impl<'a> Harvester<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, options: HarvestOptions) -> Self {
        Self { fetcher, options }
    }

    pub fn options(&self) -> &HarvestOptions {
        &self.options
    }

    /// Starts a fresh page sequence; cursors are never shared between runs
    pub fn pages(&self) -> PageStream<'_> {
        PageStream::new(self.fetcher, &self.options)
    }

    /// Harvests every page the termination rules allow
    ///
    /// # Returns
    ///
    /// * `Ok(HarvestOutcome)` - Rows collected so far, whether the listing
    ///   ended normally or a page failed
    /// * `Err(HarvestError::Schema)` - The registry broke its payload contract
    pub async fn run(&self) -> Result<HarvestOutcome, HarvestError> {
        tracing::info!(
            "Harvesting topic \"{}\" from {}",
            self.options.topic,
            self.options.api_url
        );

        let mut stream = self.pages();
        let mut table = CollectionTable::new();
        let mut reported_count = None;

        while let Some(page) = stream.next_page().await? {
            if reported_count.is_none() {
                reported_count = page.reported_count;
            }
            table.extend(page.rows);
        }

        let pages_requested = stream.pages_requested();
        let stop = stream
            .into_state()
            .stopped
            .unwrap_or(StopReason::EndOfData);

        if stop.is_truncated() {
            tracing::warn!(
                "Harvest truncated after {} pages ({}): {} rows kept",
                pages_requested,
                stop,
                table.len()
            );
        } else {
            tracing::info!(
                "Harvest finished ({}): {} rows from {} pages",
                stop,
                table.len(),
                pages_requested
            );
        }

        Ok(HarvestOutcome {
            table,
            pages_requested,
            reported_count,
            stop,
        })
    }
}

/// Harvests one topic with the given fetcher
///
/// # Example
///
/// ```no_run
/// use registry_harvest::client::ReqwestFetcher;
/// use registry_harvest::config::UserAgentConfig;
/// use registry_harvest::harvester::{harvest, HarvestOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = ReqwestFetcher::from_config(&UserAgentConfig::default())?;
/// let options = HarvestOptions::new("https://bio.tools/api/tool/", "Systems biology")
///     .with_max_pages(Some(2));
/// let outcome = harvest(&fetcher, options).await?;
/// println!("{} tools", outcome.table.len());
/// # Ok(())
/// # }
/// ```
pub async fn harvest(
    fetcher: &dyn Fetcher,
    options: HarvestOptions,
) -> Result<HarvestOutcome, HarvestError> {
    Harvester::new(fetcher, options).run().await
}
