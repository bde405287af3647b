use serde::Deserialize;

/// Main configuration structure for Siteglass
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            crawler: CrawlerConfig::default(),
            browser: BrowserConfig::default(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the API listens on
    #[serde(rename = "bind-addr", default = "default_bind_addr")]
    pub bind_addr: String,

    /// Endpoint of the subscription service, queried per request
    #[serde(rename = "subscription-url", default = "default_subscription_url")]
    pub subscription_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            subscription_url: default_subscription_url(),
        }
    }
}

/// Crawl budget and timeout configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Page budget applied when a request omits maxPages
    #[serde(rename = "default-max-pages", default = "default_max_pages")]
    pub default_max_pages: usize,

    /// Depth budget applied when a request omits maxDepth
    #[serde(rename = "default-max-depth", default = "default_max_depth")]
    pub default_max_depth: usize,

    /// Hard ceiling for caller-supplied page budgets
    #[serde(rename = "max-pages-limit", default = "default_max_pages_limit")]
    pub max_pages_limit: usize,

    /// Hard ceiling for caller-supplied depth budgets
    #[serde(rename = "max-depth-limit", default = "default_max_depth_limit")]
    pub max_depth_limit: usize,

    /// Maximum links followed out of any single page
    #[serde(rename = "fan-out-limit", default = "default_fan_out_limit")]
    pub fan_out_limit: usize,

    /// Per-page navigation timeout in seconds
    #[serde(rename = "page-load-timeout-secs", default = "default_page_load_timeout")]
    pub page_load_timeout_secs: u64,

    /// Per-page wait for the document body in seconds
    #[serde(rename = "content-wait-secs", default = "default_content_wait")]
    pub content_wait_secs: u64,

    /// Whole-job time budget in seconds, checked between pages
    #[serde(rename = "job-budget-secs", default = "default_job_budget")]
    pub job_budget_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            default_max_pages: default_max_pages(),
            default_max_depth: default_max_depth(),
            max_pages_limit: default_max_pages_limit(),
            max_depth_limit: default_max_depth_limit(),
            fan_out_limit: default_fan_out_limit(),
            page_load_timeout_secs: default_page_load_timeout(),
            content_wait_secs: default_content_wait(),
            job_budget_secs: default_job_budget(),
        }
    }
}

/// Headless browser provisioning configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Runtime environment the service is deployed into
    #[serde(default)]
    pub environment: BrowserEnvironment,

    /// Explicit browser binary path, overriding OS defaults
    #[serde(rename = "executable-path", default)]
    pub executable_path: Option<String>,

    /// Cache directory for the auto-downloaded Chromium build
    #[serde(rename = "download-dir", default)]
    pub download_dir: Option<String>,

    /// User agent presented by crawl tabs
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            environment: BrowserEnvironment::default(),
            executable_path: None,
            download_dir: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Which browser provisioning strategy to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BrowserEnvironment {
    /// Full local environment with an installed browser
    #[default]
    Local,
    /// Constrained serverless runtime; Chromium is downloaded on demand
    Serverless,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_subscription_url() -> String {
    "http://127.0.0.1:9090/api/subscriptions".to_string()
}

fn default_max_pages() -> usize {
    2
}

fn default_max_depth() -> usize {
    1
}

fn default_max_pages_limit() -> usize {
    10
}

fn default_max_depth_limit() -> usize {
    3
}

fn default_fan_out_limit() -> usize {
    2
}

fn default_page_load_timeout() -> u64 {
    30
}

fn default_content_wait() -> u64 {
    10
}

fn default_job_budget() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}
