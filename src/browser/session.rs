//! A launched Chromium instance owned by one crawl job
//!
//! Wraps the chromiumoxide `Browser` together with its spawned CDP event
//! loop and the launch plan it was started from. Implements `PageSource`
//! by opening one short-lived tab per URL.

use crate::browser::{BrowserSession, LaunchPlan};
use crate::crawler::fetcher::load_rendered;
use crate::crawler::{PageSource, TabSettings};
use crate::{Result, SiteglassError};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use url::Url;

/// One launched headless Chromium, scoped to a single crawl job
pub struct ChromiumSession {
    browser: Browser,
    events: JoinHandle<()>,
    plan: LaunchPlan,
    settings: TabSettings,
}

impl ChromiumSession {
    /// Launches a browser according to a resolved plan
    ///
    /// # Arguments
    ///
    /// * `plan` - Executable path and launch arguments
    /// * `settings` - Tab settings applied to every page this session opens
    ///
    /// # Returns
    ///
    /// * `Ok(ChromiumSession)` - Browser is up, event loop is running
    /// * `Err(SiteglassError::BrowserInit)` - Configuration or launch failed
    pub async fn launch(plan: LaunchPlan, settings: TabSettings) -> Result<Self> {
        let mut builder = BrowserConfig::builder().chrome_executable(&plan.executable);
        for arg in &plan.args {
            builder = builder.arg(arg.as_str());
        }

        let config = builder.build().map_err(SiteglassError::BrowserInit)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| SiteglassError::BrowserInit(e.to_string()))?;

        // Drain CDP events for the lifetime of the session
        let events = tokio::spawn(async move { while handler.next().await.is_some() {} });

        tracing::info!(
            "Launched browser {} ({})",
            plan.executable.display(),
            plan.source
        );

        Ok(Self {
            browser,
            events,
            plan,
            settings,
        })
    }
}

#[async_trait]
impl PageSource for ChromiumSession {
    async fn fetch_page(&self, url: &Url) -> Result<String> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| SiteglassError::PageLoad {
                url: url.to_string(),
                message: format!("failed to open tab: {}", e),
            })?;

        let outcome = load_rendered(&page, url, &self.settings).await;

        // The tab is closed on every exit path; a close failure cannot
        // change the page outcome.
        if let Err(e) = page.close().await {
            tracing::warn!("Failed to close tab for {}: {}", url, e);
        }

        outcome
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    fn plan(&self) -> &LaunchPlan {
        &self.plan
    }

    fn as_page_source(&self) -> &dyn PageSource {
        self
    }

    async fn close(self: Box<Self>) {
        let mut session = *self;

        if let Err(e) = session.browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }

        session.events.abort();
    }
}
