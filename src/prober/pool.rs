//! Bounded fan-out over a URL list
//!
//! A probe run owns its worker set: at most `max_workers` fetches are in
//! flight, results are collected from the completion stream as they finish,
//! and everything is dropped before the call returns.

use crate::client::{BodyMode, Fetcher};
use crate::config::ProberConfig;
use crate::prober::status::{ProbeReport, ProbeResult, ProbeStatus};
use futures::stream::{self, StreamExt};
use std::time::{Duration, Instant};

/// Timeout and pool width for one probe run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Per-URL request timeout
    pub timeout: Duration,

    /// Maximum number of fetches in flight
    pub max_workers: usize,
}

impl ProbeOptions {
    pub fn new(timeout: Duration, max_workers: usize) -> Self {
        Self {
            timeout,
            max_workers,
        }
    }

    pub fn from_config(config: &ProberConfig) -> Self {
        Self::new(config.timeout(), config.max_workers)
    }
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), 20)
    }
}

async fn probe_one(fetcher: &dyn Fetcher, index: usize, url: &str, timeout: Duration) -> ProbeResult {
    let outcome = fetcher.fetch(url, timeout, BodyMode::Discard).await;
    ProbeResult {
        index,
        url: url.to_string(),
        status: ProbeStatus::from(&outcome),
    }
}

/// Probes every URL with bounded concurrency
///
/// Returns exactly one result per input URL, duplicates included, in input
/// order. A slow or failing URL never holds back the others beyond its own
/// pool slot.
///
/// Connection reuse is up to the fetcher. Pass one built with
/// [`ReqwestFetcher::for_probing`](crate::client::ReqwestFetcher::for_probing)
/// so no sockets stay open after the call.
///
/// # Arguments
///
/// * `fetcher` - The HTTP adapter to use
/// * `urls` - URLs to probe
/// * `options` - Shared timeout and pool width
///
/// # Example
///
/// ```no_run
/// use registry_harvest::client::ReqwestFetcher;
/// use registry_harvest::config::UserAgentConfig;
/// use registry_harvest::prober::{probe_all, ProbeOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = ReqwestFetcher::for_probing(&UserAgentConfig::default())?;
/// let urls = ["https://bio.tools", "https://example.org"];
/// let report = probe_all(&fetcher, &urls, ProbeOptions::default()).await;
/// for result in &report {
///     println!("{} -> {}", result.url, result.status);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn probe_all<S: AsRef<str>>(
    fetcher: &dyn Fetcher,
    urls: &[S],
    options: ProbeOptions,
) -> ProbeReport {
    let workers = options.max_workers.max(1);
    let started = Instant::now();
    tracing::info!(
        "Probing {} URLs with {} workers (timeout {:?})",
        urls.len(),
        workers,
        options.timeout
    );

    let results: Vec<ProbeResult> = stream::iter(urls.iter().enumerate())
        .map(|(index, url)| probe_one(fetcher, index, url.as_ref(), options.timeout))
        .buffer_unordered(workers)
        .inspect(|result| tracing::debug!("Probed {} -> {}", result.url, result.status))
        .collect()
        .await;

    let report = ProbeReport::from_results(results);
    tracing::info!(
        "Probed {} URLs in {:?}: {} without response",
        report.len(),
        started.elapsed(),
        report.failure_count()
    );
    report
}

/// Probes every URL one at a time, in input order
///
/// Same result contract as [`probe_all`] with a single worker.
pub async fn probe_sequential<S: AsRef<str>>(
    fetcher: &dyn Fetcher,
    urls: &[S],
    timeout: Duration,
) -> ProbeReport {
    let mut results = Vec::with_capacity(urls.len());
    for (index, url) in urls.iter().enumerate() {
        let result = probe_one(fetcher, index, url.as_ref(), timeout).await;
        tracing::debug!("Probed {} -> {}", result.url, result.status);
        results.push(result);
    }
    ProbeReport::from_results(results)
}
