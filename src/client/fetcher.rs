//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests issued by the harvester and the
//! prober, including:
//! - Building the shared HTTP client with a proper user agent string
//! - Single-attempt GET requests bounded by a caller-supplied timeout
//! - Error classification into `timeout` and `error`

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Whether the caller needs the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// Ask for JSON and read the full body
    Json,
    /// Only the status code matters; the body is never read
    Discard,
}

/// Result of a single fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// An HTTP response was received (any status)
    Response {
        /// The HTTP status code
        status: u16,
        /// Body text, present only for [`BodyMode::Json`]
        body: Option<String>,
    },

    /// The request exceeded its timeout
    Timeout,

    /// Any other transport failure (DNS, connection refused, malformed response)
    Error(String),
}

impl FetchOutcome {
    /// Returns the status code if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if a 2xx response was received
    pub fn is_success(&self) -> bool {
        matches!(self.status(), Some(status) if (200..300).contains(&status))
    }
}

/// A single-attempt GET with a timeout
///
/// Implementations never return `Err`: every failure is folded into
/// [`FetchOutcome`] so callers can fan out without a fault crossing the
/// task boundary.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration, mode: BodyMode) -> FetchOutcome;
}

/// Builds an HTTP client with proper configuration
///
/// Timeouts are applied per request, so the client itself carries none.
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use registry_harvest::client::build_http_client;
/// use registry_harvest::config::UserAgentConfig;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    client_builder(config).build()
}

/// Builds an HTTP client that keeps no idle connections
///
/// Every connection is closed as soon as its response is done, so a probe
/// run over many hosts leaves no sockets open once it returns.
pub fn build_probe_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    client_builder(config).pool_max_idle_per_host(0).build()
}

fn client_builder(config: &UserAgentConfig) -> ClientBuilder {
    Client::builder()
        .user_agent(config.header_value())
        .gzip(true)
        .brotli(true)
}

/// [`Fetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Wraps an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from the user agent configuration
    pub fn from_config(config: &UserAgentConfig) -> crate::Result<Self> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Builds a fetcher for probing: connections are not pooled
    pub fn for_probing(config: &UserAgentConfig) -> crate::Result<Self> {
        Ok(Self::new(build_probe_client(config)?))
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, timeout: Duration, mode: BodyMode) -> FetchOutcome {
        let mut request = self.client.get(url).timeout(timeout);
        if mode == BodyMode::Json {
            request = request.header(ACCEPT, "application/json");
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return classify_error(url, e),
        };

        let status = response.status().as_u16();
        tracing::trace!("GET {} -> {}", url, status);

        match mode {
            BodyMode::Discard => FetchOutcome::Response { status, body: None },
            BodyMode::Json => match response.text().await {
                Ok(body) => FetchOutcome::Response {
                    status,
                    body: Some(body),
                },
                Err(e) => classify_error(url, e),
            },
        }
    }
}

/// Maps a transport failure onto the closed outcome set
fn classify_error(url: &str, error: reqwest::Error) -> FetchOutcome {
    if error.is_timeout() {
        tracing::debug!("Request timeout for {}", url);
        FetchOutcome::Timeout
    } else {
        tracing::debug!("Transport error for {}: {}", url, error);
        FetchOutcome::Error(error.to_string())
    }
}
