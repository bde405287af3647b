//! Siteglass: a bounded headless-browser site scraper
//!
//! This crate implements a small HTTP service that crawls a budget-bounded
//! slice of a single website with a headless browser, extracts structured
//! content from each page, and returns one aggregated content report.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod report;
pub mod server;
pub mod url;

use thiserror::Error;

/// Main error type for Siteglass operations
#[derive(Debug, Error)]
pub enum SiteglassError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser initialization failed: {0}")]
    BrowserInit(String),

    #[error("Navigation timeout for {url}")]
    NavigationTimeout { url: String },

    #[error("Timed out waiting for page content at {url}")]
    ContentTimeout { url: String },

    #[error("Page load failed for {url}: {message}")]
    PageLoad { url: String, message: String },

    #[error("Invalid seed URL {url}: {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("Subscription lookup failed: {0}")]
    Subscription(#[from] server::subscription::SubscriptionError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Siteglass operations
pub type Result<T> = std::result::Result<T, SiteglassError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlLimits, PageResult, PageStatus};
pub use report::ContentReport;
pub use url::{extract_host, normalize_target_url, resolve_candidate};
