//! Browser provisioning for Siteglass
//!
//! Obtaining a working headless browser differs sharply between a full
//! local environment (use the installed Chrome) and a constrained
//! serverless runtime (download a portable Chromium and launch it without
//! sandboxing). Both are hidden behind the `BrowserProvisioner` strategy
//! trait, selected once from configuration, so the rest of the service and
//! the tests never see the difference.

mod local;
mod serverless;
mod session;

pub use local::LocalChromeProvisioner;
pub use serverless::ServerlessChromiumProvisioner;
pub use session::ChromiumSession;

use crate::config::{BrowserEnvironment, Config};
use crate::crawler::{PageSource, TabSettings};
use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// A resolved browser launch: which binary, with which arguments
///
/// Exposed for diagnostics; the health endpoint reports it without
/// launching anything.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    /// Path to the browser executable
    pub executable: PathBuf,

    /// Extra command-line arguments for the launch
    pub args: Vec<String>,

    /// Where the binary came from ("system" or "auto-download")
    pub source: &'static str,
}

/// Strategy for producing a ready-to-use headless browser
#[async_trait]
pub trait BrowserProvisioner: Send + Sync {
    /// Label of the runtime this provisioner targets
    fn environment(&self) -> &'static str;

    /// Label of where the browser binary comes from
    fn binary_source(&self) -> &'static str;

    /// Resolves the executable and launch arguments without launching
    async fn launch_plan(&self) -> Result<LaunchPlan>;

    /// Launches the browser and returns an open session
    ///
    /// Any resolution or launch failure is fatal for the whole job and
    /// surfaces as `SiteglassError::BrowserInit`.
    async fn open(&self) -> Result<Box<dyn BrowserSession>>;
}

/// An open browser owned by exactly one crawl job
#[async_trait]
pub trait BrowserSession: PageSource {
    /// The launch configuration this session was started with
    fn plan(&self) -> &LaunchPlan;

    /// The session viewed as a page source for the crawl controller
    fn as_page_source(&self) -> &dyn PageSource;

    /// Shuts the browser down
    ///
    /// Close failures are logged, never propagated; by this point the
    /// job's results are already finalized.
    async fn close(self: Box<Self>);
}

/// Selects the provisioner matching the configured runtime environment
pub fn provisioner_for(config: &Config) -> Arc<dyn BrowserProvisioner> {
    let settings = TabSettings::from_config(config);

    match config.browser.environment {
        BrowserEnvironment::Local => {
            Arc::new(LocalChromeProvisioner::new(&config.browser, settings))
        }
        BrowserEnvironment::Serverless => {
            Arc::new(ServerlessChromiumProvisioner::new(&config.browser, settings))
        }
    }
}
