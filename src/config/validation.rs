//! Configuration validation
//!
//! Checks loaded configuration values for internal consistency before the
//! service starts: budget ordering, non-zero timeouts, and parseable
//! addresses.

use crate::config::types::Config;
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates a loaded configuration
///
/// # Arguments
///
/// * `config` - The configuration to validate
///
/// # Returns
///
/// * `Ok(())` - Configuration is usable
/// * `Err(ConfigError::Validation)` - A value is out of range or malformed
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server(config)?;
    validate_crawler(config)?;
    validate_browser(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ConfigError> {
    config
        .server
        .bind_addr
        .parse::<SocketAddr>()
        .map_err(|e| {
            ConfigError::Validation(format!(
                "bind-addr '{}' is not a socket address: {}",
                config.server.bind_addr, e
            ))
        })?;

    let subscription_url = Url::parse(&config.server.subscription_url).map_err(|e| {
        ConfigError::Validation(format!(
            "subscription-url '{}' is not a URL: {}",
            config.server.subscription_url, e
        ))
    })?;

    if subscription_url.scheme() != "http" && subscription_url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "subscription-url must use http or https, got '{}'",
            subscription_url.scheme()
        )));
    }

    Ok(())
}

fn validate_crawler(config: &Config) -> Result<(), ConfigError> {
    let crawler = &config.crawler;

    if crawler.default_max_pages == 0 {
        return Err(ConfigError::Validation(
            "default-max-pages must be at least 1".to_string(),
        ));
    }

    if crawler.max_pages_limit < crawler.default_max_pages {
        return Err(ConfigError::Validation(format!(
            "max-pages-limit ({}) must not be below default-max-pages ({})",
            crawler.max_pages_limit, crawler.default_max_pages
        )));
    }

    if crawler.max_depth_limit < crawler.default_max_depth {
        return Err(ConfigError::Validation(format!(
            "max-depth-limit ({}) must not be below default-max-depth ({})",
            crawler.max_depth_limit, crawler.default_max_depth
        )));
    }

    if crawler.fan_out_limit == 0 {
        return Err(ConfigError::Validation(
            "fan-out-limit must be at least 1".to_string(),
        ));
    }

    for (name, value) in [
        ("page-load-timeout-secs", crawler.page_load_timeout_secs),
        ("content-wait-secs", crawler.content_wait_secs),
        ("job-budget-secs", crawler.job_budget_secs),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be at least 1",
                name
            )));
        }
    }

    Ok(())
}

fn validate_browser(config: &Config) -> Result<(), ConfigError> {
    if config.browser.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent must not be empty".to_string(),
        ));
    }

    if let Some(path) = &config.browser.executable_path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "executable-path must not be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_rejects_zero_page_budget() {
        let mut config = Config::default();
        config.crawler.default_max_pages = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_limit_below_default() {
        let mut config = Config::default();
        config.crawler.default_max_pages = 5;
        config.crawler.max_pages_limit = 3;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_fan_out() {
        let mut config = Config::default();
        config.crawler.fan_out_limit = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = Config::default();
        config.crawler.content_wait_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_bad_bind_addr() {
        let mut config = Config::default();
        config.server.bind_addr = "not-an-address".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_non_http_subscription_url() {
        let mut config = Config::default();
        config.server.subscription_url = "ftp://billing.internal/subs".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_blank_user_agent() {
        let mut config = Config::default();
        config.browser.user_agent = "   ".to_string();
        assert!(validate(&config).is_err());
    }
}
