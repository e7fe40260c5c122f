//! Registry-Harvest: a paginated tool-registry harvester and endpoint prober
//!
//! This crate follows a registry's "next page" cursor to assemble a topic's
//! catalog into a single rectangular table, and checks the reachability of
//! lists of URLs under a bounded worker pool.

pub mod client;
pub mod config;
pub mod harvester;
pub mod output;
pub mod prober;
pub mod registry;

use thiserror::Error;

/// Main error type for Registry-Harvest operations
///
/// Ordinary network flakiness never surfaces here during a harvest or a
/// probe; it is folded into [`harvester::StopReason`] and
/// [`prober::ProbeStatus`] instead.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry contract violated: {0}")]
    Schema(#[from] SchemaError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// A registry payload that is not a decodable mapping
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("page {page} body is not valid JSON: {message}")]
    MalformedPage { page: u32, message: String },

    #[error("page {page} body is a JSON {found}, expected an object")]
    PageNotObject { page: u32, found: &'static str },

    #[error("record is a JSON {found}, expected an object")]
    RecordNotObject { found: &'static str },

    #[error("response is missing the `{field}` field")]
    MissingField { field: &'static str },
}

/// Result type alias for Registry-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::{FetchOutcome, Fetcher, ReqwestFetcher};
pub use config::Config;
pub use harvester::{harvest, HarvestOptions, HarvestOutcome, Harvester, StopReason};
pub use prober::{probe_all, probe_sequential, ProbeReport, ProbeResult, ProbeStatus};
pub use registry::{CollectionTable, Column, Row};
