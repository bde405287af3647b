//! Serverless browser provisioning
//!
//! Constrained runtimes ship no browser, so a portable Chromium build is
//! fetched into a cache directory on first use and launched with the
//! sandboxing features those runtimes cannot provide switched off.

use crate::browser::session::ChromiumSession;
use crate::browser::{BrowserProvisioner, BrowserSession, LaunchPlan};
use crate::config::BrowserConfig;
use crate::crawler::TabSettings;
use crate::{Result, SiteglassError};
use async_trait::async_trait;
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use std::path::PathBuf;

/// Launch arguments required in constrained serverless runtimes
const SERVERLESS_ARGS: [&str; 6] = [
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--single-process",
    "--no-zygote",
];

/// Provisions an auto-downloaded Chromium for serverless runtimes
pub struct ServerlessChromiumProvisioner {
    download_dir: PathBuf,
    settings: TabSettings,
}

impl ServerlessChromiumProvisioner {
    /// Creates a serverless provisioner from the browser configuration
    ///
    /// The download cache defaults to a directory under the system temp
    /// dir when no `download-dir` is configured.
    pub fn new(config: &BrowserConfig, settings: TabSettings) -> Self {
        let download_dir = config
            .download_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("siteglass-chromium"));

        Self {
            download_dir,
            settings,
        }
    }

    async fn fetch_chromium(&self) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .map_err(|e| {
                SiteglassError::BrowserInit(format!(
                    "failed to create download dir {}: {}",
                    self.download_dir.display(),
                    e
                ))
            })?;

        let options = BrowserFetcherOptions::builder()
            .with_path(&self.download_dir)
            .build()
            .map_err(|e| SiteglassError::BrowserInit(format!("fetcher options: {}", e)))?;

        let fetcher = BrowserFetcher::new(options);

        tracing::info!(
            "Resolving portable Chromium in {}",
            self.download_dir.display()
        );
        let info = fetcher
            .fetch()
            .await
            .map_err(|e| SiteglassError::BrowserInit(format!("chromium download failed: {}", e)))?;

        Ok(info.executable_path)
    }
}

#[async_trait]
impl BrowserProvisioner for ServerlessChromiumProvisioner {
    fn environment(&self) -> &'static str {
        "serverless"
    }

    fn binary_source(&self) -> &'static str {
        "auto-download"
    }

    async fn launch_plan(&self) -> Result<LaunchPlan> {
        let executable = self.fetch_chromium().await?;
        Ok(LaunchPlan {
            executable,
            args: SERVERLESS_ARGS.iter().map(|a| a.to_string()).collect(),
            source: self.binary_source(),
        })
    }

    async fn open(&self) -> Result<Box<dyn BrowserSession>> {
        let plan = self.launch_plan().await?;
        let session = ChromiumSession::launch(plan, self.settings.clone()).await?;
        Ok(Box::new(session))
    }
}
