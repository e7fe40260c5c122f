use crate::config::validation::validate;
use crate::ConfigResult;
use serde::Deserialize;
use std::time::Duration;

/// Registry endpoint used when no `api-url` is configured
pub const DEFAULT_API_URL: &str = "https://bio.tools/api/tool/";

/// Main configuration structure for Registry-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub registry: RegistryConfig,
    pub prober: ProberConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

impl Config {
    /// Applies command-line overrides and validates the result
    ///
    /// Overridden values go through the same checks as values read from a
    /// file.
    pub fn with_overrides(mut self, overrides: &Overrides) -> ConfigResult<Self> {
        if let Some(topic) = &overrides.topic {
            self.registry.topic = topic.clone();
        }
        if overrides.max_pages.is_some() {
            self.registry.max_pages = overrides.max_pages;
        }
        if let Some(ms) = overrides.timeout_ms {
            self.prober.timeout_ms = ms;
        }
        if let Some(workers) = overrides.max_workers {
            self.prober.max_workers = workers;
        }

        validate(&self)?;
        Ok(self)
    }
}

/// Values supplied on the command line that replace configured ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub topic: Option<String>,
    pub max_pages: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub max_workers: Option<usize>,
}

/// Registry harvesting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of the registry's tool listing endpoint
    #[serde(rename = "api-url")]
    pub api_url: String,

    /// Topic used to filter the catalog
    pub topic: String,

    /// Timeout for each page request (milliseconds)
    #[serde(rename = "page-timeout-ms")]
    pub page_timeout_ms: u64,

    /// Optional hard cap on the number of pages requested
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,
}

impl RegistryConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            topic: "Systems biology".to_string(),
            page_timeout_ms: 2000,
            max_pages: None,
        }
    }
}

/// Endpoint prober configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProberConfig {
    /// Per-URL request timeout (milliseconds)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Width of the worker pool
    #[serde(rename = "max-workers")]
    pub max_workers: usize,
}

impl ProberConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2000,
            max_workers: 20,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name sent in the User-Agent header
    pub name: String,

    /// Version sent in the User-Agent header
    pub version: String,
}

impl UserAgentConfig {
    /// Formats the header value as `name/version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "registry-harvest".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
