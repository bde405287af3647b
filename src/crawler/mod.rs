//! Crawler module for bounded page traversal and extraction
//!
//! This module contains the core crawling logic, including:
//! - Per-job traversal state and budgets
//! - Browser-tab page fetching with bounded waits
//! - Pure content and link extraction from rendered HTML
//! - The worklist-driven crawl controller

pub mod controller;
pub mod extractor;
pub(crate) mod fetcher;
mod job;

pub use extractor::{discover_links, extract_content, PageContent};
pub use fetcher::{PageSource, TabSettings};
pub use job::{CrawlJob, CrawlLimits, ImageRef, PageResult, PageStatus};

use crate::browser::BrowserProvisioner;
use crate::config::Config;
use crate::Result;
use std::time::{Duration, Instant};
use url::Url;

/// Runs a complete crawl job against a provisioned browser
///
/// This is the main entry point for one crawl. It will:
/// 1. Open a browser session through the provisioner (fatal on failure)
/// 2. Drive the bounded traversal from the seed URL
/// 3. Close the session, logging (never propagating) close failures
/// 4. Yield the attempted pages in visitation order
///
/// # Arguments
///
/// * `config` - The service configuration
/// * `provisioner` - The browser provisioning strategy for this runtime
/// * `seed` - Validated absolute URL to start from
/// * `limits` - Effective budgets for this job
///
/// # Returns
///
/// * `Ok(Vec<PageResult>)` - Attempted pages, including failed ones
/// * `Err(SiteglassError)` - The browser could not be provisioned
pub async fn crawl(
    config: &Config,
    provisioner: &dyn BrowserProvisioner,
    seed: Url,
    limits: CrawlLimits,
) -> Result<Vec<PageResult>> {
    let session = provisioner.open().await?;

    let deadline = Instant::now() + Duration::from_secs(config.crawler.job_budget_secs);
    let mut job = CrawlJob::new(seed, limits)?.with_deadline(deadline);

    controller::run(session.as_page_source(), &mut job).await;

    session.close().await;

    Ok(job.into_pages())
}
