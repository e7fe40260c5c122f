//! Probe result types

use crate::client::FetchOutcome;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Outcome of probing one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProbeStatus {
    /// An HTTP response arrived with this status code
    Code(u16),

    /// No response within the timeout
    Timeout,

    /// Any other failure (DNS, connection refused, malformed response)
    Error,
}

impl ProbeStatus {
    /// True for a 2xx response
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Code(code) if (200..300).contains(code))
    }

    /// True when no HTTP response was received
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Timeout | Self::Error)
    }
}

impl From<&FetchOutcome> for ProbeStatus {
    fn from(outcome: &FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Response { status, .. } => Self::Code(*status),
            FetchOutcome::Timeout => Self::Timeout,
            FetchOutcome::Error(_) => Self::Error,
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{}", code),
            Self::Timeout => f.write_str("timeout"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Status codes serialize as numbers, symbolic outcomes as strings
impl Serialize for ProbeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Code(code) => serializer.serialize_u16(*code),
            Self::Timeout => serializer.serialize_str("timeout"),
            Self::Error => serializer.serialize_str("error"),
        }
    }
}

/// One (url, result) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    /// Position of the URL in the caller's input
    #[serde(skip)]
    pub index: usize,

    /// The probed URL
    pub url: String,

    /// What happened
    #[serde(rename = "result")]
    pub status: ProbeStatus,
}

/// All results of one probe run, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProbeReport {
    results: Vec<ProbeResult>,
}

impl ProbeReport {
    /// Builds a report, restoring input order from each result's index
    pub fn from_results(mut results: Vec<ProbeResult>) -> Self {
        results.sort_by_key(|result| result.index);
        Self { results }
    }

    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProbeResult> {
        self.results.iter()
    }

    /// Results that received no HTTP response
    pub fn failures(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(|r| r.status.is_failure())
    }

    /// Number of results that received no HTTP response
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Number of results per status
    pub fn counts(&self) -> BTreeMap<ProbeStatus, usize> {
        let mut counts = BTreeMap::new();
        for result in &self.results {
            *counts.entry(result.status).or_insert(0) += 1;
        }
        counts
    }

    pub fn into_results(self) -> Vec<ProbeResult> {
        self.results
    }
}

impl<'a> IntoIterator for &'a ProbeReport {
    type Item = &'a ProbeResult;
    type IntoIter = std::slice::Iter<'a, ProbeResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(index: usize, url: &str, status: ProbeStatus) -> ProbeResult {
        ProbeResult {
            index,
            url: url.to_string(),
            status,
        }
    }

    #[test]
    fn test_status_from_outcome() {
        let response = FetchOutcome::Response {
            status: 301,
            body: None,
        };
        assert_eq!(ProbeStatus::from(&response), ProbeStatus::Code(301));
        assert_eq!(ProbeStatus::from(&FetchOutcome::Timeout), ProbeStatus::Timeout);
        assert_eq!(
            ProbeStatus::from(&FetchOutcome::Error("dns".to_string())),
            ProbeStatus::Error
        );
    }

    #[test]
    fn test_status_display_and_json() {
        assert_eq!(ProbeStatus::Code(200).to_string(), "200");
        assert_eq!(ProbeStatus::Timeout.to_string(), "timeout");
        assert_eq!(
            serde_json::to_string(&vec![
                ProbeStatus::Code(404),
                ProbeStatus::Timeout,
                ProbeStatus::Error
            ])
            .unwrap(),
            r#"[404,"timeout","error"]"#
        );
    }

    #[test]
    fn test_report_restores_input_order() {
        let report = ProbeReport::from_results(vec![
            result(2, "c", ProbeStatus::Error),
            result(0, "a", ProbeStatus::Code(200)),
            result(1, "b", ProbeStatus::Timeout),
        ]);

        let urls: Vec<_> = report.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_report_counts() {
        let report = ProbeReport::from_results(vec![
            result(0, "a", ProbeStatus::Code(200)),
            result(1, "b", ProbeStatus::Code(200)),
            result(2, "c", ProbeStatus::Code(404)),
            result(3, "d", ProbeStatus::Timeout),
            result(4, "e", ProbeStatus::Error),
        ]);

        let counts = report.counts();
        assert_eq!(counts[&ProbeStatus::Code(200)], 2);
        assert_eq!(counts[&ProbeStatus::Code(404)], 1);
        assert_eq!(report.failure_count(), 2);
    }

    #[test]
    fn test_report_serializes_url_and_result() {
        let report = ProbeReport::from_results(vec![result(0, "http://ok", ProbeStatus::Code(200))]);
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"[{"url":"http://ok","result":200}]"#
        );
    }
}
