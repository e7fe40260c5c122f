//! Registry total-count query

use crate::client::{BodyMode, FetchOutcome, Fetcher};
use crate::{HarvestError, SchemaError};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Asks the registry how many records it holds
///
/// Unlike a harvest, this call fails loudly: a non-success status or a
/// transport failure is returned as an error.
///
/// # Arguments
///
/// * `fetcher` - The HTTP adapter to use
/// * `api_url` - Base URL of the registry listing endpoint
/// * `timeout` - Request timeout
pub async fn total_count(
    fetcher: &dyn Fetcher,
    api_url: &str,
    timeout: Duration,
) -> Result<u64, HarvestError> {
    let mut url = Url::parse(api_url)?;
    url.query_pairs_mut().append_pair("format", "json");

    match fetcher.fetch(url.as_str(), timeout, BodyMode::Json).await {
        FetchOutcome::Response { status, body } if (200..300).contains(&status) => {
            let value: Value = serde_json::from_str(body.as_deref().unwrap_or_default())
                .map_err(|e| SchemaError::MalformedPage {
                    page: 1,
                    message: e.to_string(),
                })?;
            let count = value
                .get("count")
                .and_then(Value::as_u64)
                .ok_or(SchemaError::MissingField { field: "count" })?;
            tracing::debug!("Registry at {} reports {} records", api_url, count);
            Ok(count)
        }
        FetchOutcome::Response { status, .. } => Err(HarvestError::Status {
            url: url.to_string(),
            status,
        }),
        FetchOutcome::Timeout => Err(HarvestError::Timeout {
            url: url.to_string(),
        }),
        FetchOutcome::Error(message) => Err(HarvestError::Transport {
            url: url.to_string(),
            message,
        }),
    }
}
