//! Local browser provisioning
//!
//! Uses the operating system's installed Chrome. Resolution order:
//! explicit `executable-path` from configuration, then the
//! `CHROME_EXECUTABLE` environment variable, then a per-OS default path.

use crate::browser::session::ChromiumSession;
use crate::browser::{BrowserProvisioner, BrowserSession, LaunchPlan};
use crate::config::BrowserConfig;
use crate::crawler::TabSettings;
use crate::{Result, SiteglassError};
use async_trait::async_trait;
use std::path::PathBuf;

/// Environment variable overriding the local browser binary path
const CHROME_ENV_VAR: &str = "CHROME_EXECUTABLE";

/// Provisions the OS-installed Chrome for full local environments
pub struct LocalChromeProvisioner {
    executable_override: Option<String>,
    settings: TabSettings,
}

impl LocalChromeProvisioner {
    /// Creates a local provisioner from the browser configuration
    pub fn new(config: &BrowserConfig, settings: TabSettings) -> Self {
        Self {
            executable_override: config.executable_path.clone(),
            settings,
        }
    }

    fn resolve_executable(&self) -> Result<PathBuf> {
        if let Some(path) = &self.executable_override {
            return checked_path(PathBuf::from(path), "configured executable-path");
        }

        if let Ok(path) = std::env::var(CHROME_ENV_VAR) {
            if !path.trim().is_empty() {
                return checked_path(PathBuf::from(path), CHROME_ENV_VAR);
            }
        }

        let os = std::env::consts::OS;
        let default = default_chrome_path(os).ok_or_else(|| {
            SiteglassError::BrowserInit(format!("no default Chrome path known for OS '{}'", os))
        })?;

        checked_path(default, "OS default")
    }
}

/// Default installed-Chrome locations per operating system
fn default_chrome_path(os: &str) -> Option<PathBuf> {
    let path = match os {
        "linux" => "/usr/bin/google-chrome",
        "macos" => "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "windows" => r"C:\Program Files\Google\Chrome\Application\chrome.exe",
        _ => return None,
    };
    Some(PathBuf::from(path))
}

fn checked_path(path: PathBuf, origin: &str) -> Result<PathBuf> {
    if path.exists() {
        Ok(path)
    } else {
        Err(SiteglassError::BrowserInit(format!(
            "browser binary not found at {} (from {})",
            path.display(),
            origin
        )))
    }
}

#[async_trait]
impl BrowserProvisioner for LocalChromeProvisioner {
    fn environment(&self) -> &'static str {
        "local"
    }

    fn binary_source(&self) -> &'static str {
        "system"
    }

    async fn launch_plan(&self) -> Result<LaunchPlan> {
        let executable = self.resolve_executable()?;
        Ok(LaunchPlan {
            executable,
            args: Vec::new(),
            source: self.binary_source(),
        })
    }

    async fn open(&self) -> Result<Box<dyn BrowserSession>> {
        let plan = self.launch_plan().await?;
        let session = ChromiumSession::launch(plan, self.settings.clone()).await?;
        Ok(Box::new(session))
    }
}
