//! Configuration module for Siteglass
//!
//! Handles loading, parsing, and validating the TOML configuration file,
//! plus content hashing for drift detection.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{BrowserConfig, BrowserEnvironment, Config, CrawlerConfig, ServerConfig};
pub use validation::validate;
