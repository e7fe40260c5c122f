//! Configuration module for Registry-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing sections and keys fall back to defaults.
//!
//! # Example
//!
//! ```no_run
//! use registry_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvesting topic: {}", config.registry.topic);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, Overrides, ProberConfig, RegistryConfig, UserAgentConfig, DEFAULT_API_URL};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
