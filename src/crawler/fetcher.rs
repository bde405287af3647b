//! Page fetching through a headless browser tab
//!
//! This module defines the `PageSource` seam the crawl controller drives,
//! plus the chromiumoxide tab driver used by real browser sessions. Each
//! URL gets its own tab with a bounded navigation wait and a bounded
//! document-body wait; the tab is closed on every exit path.

use crate::config::Config;
use crate::{Result, SiteglassError};
use async_trait::async_trait;
use chromiumoxide::Page;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use url::Url;

/// Interval between document-body readiness polls
const BODY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A source of rendered page markup
///
/// The controller only ever sees this trait, so tests substitute a fake
/// source with no browser behind it.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Loads one URL and returns its rendered HTML
    async fn fetch_page(&self, url: &Url) -> Result<String>;
}

/// Per-tab settings applied before navigation
#[derive(Debug, Clone)]
pub struct TabSettings {
    /// User agent presented to the target site
    pub user_agent: String,

    /// Bound on navigation plus load wait
    pub page_load_timeout: Duration,

    /// Bound on the document-body readiness wait
    pub content_wait: Duration,
}

impl TabSettings {
    /// Builds tab settings from the service configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            user_agent: config.browser.user_agent.clone(),
            page_load_timeout: Duration::from_secs(config.crawler.page_load_timeout_secs),
            content_wait: Duration::from_secs(config.crawler.content_wait_secs),
        }
    }
}

/// Loads a URL in an already-open tab and captures the rendered HTML
///
/// The caller owns the tab and is responsible for closing it; this
/// function only navigates and reads.
///
/// # Arguments
///
/// * `page` - A fresh browser tab
/// * `url` - The URL to load
/// * `settings` - User agent and timeout bounds
///
/// # Returns
///
/// * `Ok(String)` - The rendered page markup
/// * `Err(SiteglassError)` - Navigation, readiness, or capture failed
pub(crate) async fn load_rendered(page: &Page, url: &Url, settings: &TabSettings) -> Result<String> {
    page.set_user_agent(&settings.user_agent)
        .await
        .map_err(|e| SiteglassError::PageLoad {
            url: url.to_string(),
            message: format!("failed to set user agent: {}", e),
        })?;

    let navigation = timeout(settings.page_load_timeout, async {
        page.goto(url.as_str()).await?;
        page.wait_for_navigation().await?;
        Ok::<(), chromiumoxide::error::CdpError>(())
    })
    .await;

    match navigation {
        Err(_) => {
            return Err(SiteglassError::NavigationTimeout {
                url: url.to_string(),
            })
        }
        Ok(Err(e)) => {
            return Err(SiteglassError::PageLoad {
                url: url.to_string(),
                message: e.to_string(),
            })
        }
        Ok(Ok(())) => {}
    }

    wait_for_body(page, url, settings.content_wait).await?;

    page.content().await.map_err(|e| SiteglassError::PageLoad {
        url: url.to_string(),
        message: format!("failed to capture content: {}", e),
    })
}

/// Polls until the document body exists or the wait budget runs out
async fn wait_for_body(page: &Page, url: &Url, limit: Duration) -> Result<()> {
    let deadline = Instant::now() + limit;

    loop {
        let ready = page
            .evaluate("document.body !== null")
            .await
            .ok()
            .and_then(|value| value.into_value::<bool>().ok())
            .unwrap_or(false);

        if ready {
            return Ok(());
        }

        if Instant::now() >= deadline {
            return Err(SiteglassError::ContentTimeout {
                url: url.to_string(),
            });
        }

        tokio::time::sleep(BODY_POLL_INTERVAL).await;
    }
}
