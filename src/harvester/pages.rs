//! Lazy page sequence over a registry listing
//!
//! Each pull issues at most one request. The termination check runs before
//! every pull, so a finished sequence never touches the network again.

use crate::client::{BodyMode, FetchOutcome, Fetcher};
use crate::harvester::state::{HarvestState, StopReason};
use crate::harvester::HarvestOptions;
use crate::registry::{normalize, page_url, RegistryPage, Row};
use crate::{HarvestError, SchemaError};

/// One successfully harvested page
#[derive(Debug, Clone)]
pub struct HarvestedPage {
    /// 1-based page index
    pub index: u32,

    /// Total record count reported by the registry, if any
    pub reported_count: Option<u64>,

    /// Normalized rows in arrival order
    pub rows: Vec<Row>,
}

/// Pull-based iterator over the pages of one listing
pub struct PageStream<'a> {
    fetcher: &'a dyn Fetcher,
    options: &'a HarvestOptions,
    state: HarvestState,
}

impl<'a> PageStream<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, options: &'a HarvestOptions) -> Self {
        Self {
            fetcher,
            options,
            state: HarvestState::new(),
        }
    }

    /// Fetches and normalizes the next page
    ///
    /// # Returns
    ///
    /// * `Ok(Some(page))` - A page was harvested
    /// * `Ok(None)` - The sequence is over; see [`PageStream::stop_reason`]
    /// * `Err(HarvestError::Schema)` - The registry sent an undecodable payload
    pub async fn next_page(&mut self) -> Result<Option<HarvestedPage>, HarvestError> {
        if self.state.check_termination(self.options.max_pages).is_some() {
            return Ok(None);
        }

        let Some(cursor) = self.state.cursor.as_ref() else {
            return Ok(None);
        };
        let url = page_url(&self.options.api_url, &self.options.topic, cursor)?;
        let index = self.state.pages_requested + 1;
        self.state.pages_requested = index;

        tracing::debug!("Requesting page {}: {}", index, url);
        let outcome = self
            .fetcher
            .fetch(url.as_str(), self.options.page_timeout, BodyMode::Json)
            .await;

        let body = match outcome {
            FetchOutcome::Response { status, body } if (200..300).contains(&status) => {
                body.unwrap_or_default()
            }
            FetchOutcome::Response { status, .. } => {
                tracing::info!("Page {} returned HTTP {}; stopping", index, status);
                self.state.stop(StopReason::NonSuccessStatus { status });
                return Ok(None);
            }
            FetchOutcome::Timeout => {
                tracing::warn!("Page {} timed out; keeping rows collected so far", index);
                self.state.stop(StopReason::Timeout);
                return Ok(None);
            }
            FetchOutcome::Error(message) => {
                tracing::warn!(
                    "Page {} failed ({}); keeping rows collected so far",
                    index,
                    message
                );
                self.state.stop(StopReason::TransportError { message });
                return Ok(None);
            }
        };

        let page = RegistryPage::decode(index, &body)?;
        let rows = page
            .records
            .iter()
            .map(normalize)
            .collect::<Result<Vec<_>, SchemaError>>()?;

        tracing::debug!(
            "Page {}: {} records, next = {:?}",
            index,
            rows.len(),
            page.next
        );
        self.state.advance(page.next);

        Ok(Some(HarvestedPage {
            index,
            reported_count: page.count,
            rows,
        }))
    }

    /// Number of page requests issued so far
    pub fn pages_requested(&self) -> u32 {
        self.state.pages_requested
    }

    /// Why the sequence ended, once it has
    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.state.stopped.as_ref()
    }

    /// Consumes the stream, returning its final state
    pub fn into_state(self) -> HarvestState {
        self.state
    }
}
