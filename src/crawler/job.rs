//! Per-request crawl state
//!
//! A `CrawlJob` owns everything one crawl mutates: the visited set, the
//! accumulated page results, and the budgets. It lives for a single HTTP
//! request and is discarded once the report is generated.

use crate::crawler::extractor::PageContent;
use crate::url::extract_host;
use crate::{SiteglassError, UrlError};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;
use url::Url;

/// Budgets bounding a single crawl job
#[derive(Debug, Clone, Copy)]
pub struct CrawlLimits {
    /// Hard ceiling on total pages attempted
    pub max_pages: usize,

    /// Hard ceiling on link-following depth from the seed
    pub max_depth: usize,

    /// Maximum links followed out of any single page
    pub fan_out: usize,
}

/// Terminal outcome of one page attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Success,
    Failed,
}

/// An image reference extracted from a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

/// The per-URL outcome record produced by the extraction step
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub url: String,
    pub depth: usize,
    pub status: PageStatus,
    pub title: String,
    pub description: String,
    pub main_heading: String,
    /// Heading texts keyed by level ("h1".."h6"), in document order
    pub headings: BTreeMap<String, Vec<String>>,
    pub paragraphs: Vec<String>,
    pub images: Vec<ImageRef>,
    pub main_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResult {
    /// Builds a successful result from extracted content
    pub fn success(url: &Url, depth: usize, content: PageContent) -> Self {
        Self {
            url: url.to_string(),
            depth,
            status: PageStatus::Success,
            title: content.title,
            description: content.description,
            main_heading: content.main_heading,
            headings: content.headings,
            paragraphs: content.paragraphs,
            images: content.images,
            main_content: content.main_content,
            error: None,
        }
    }

    /// Builds a failed result carrying the error message
    pub fn failed(url: &Url, depth: usize, error: String) -> Self {
        Self {
            url: url.to_string(),
            depth,
            status: PageStatus::Failed,
            title: String::new(),
            description: String::new(),
            main_heading: String::new(),
            headings: BTreeMap::new(),
            paragraphs: Vec::new(),
            images: Vec::new(),
            main_content: String::new(),
            error: Some(error),
        }
    }

    /// Returns true for successfully extracted pages
    pub fn is_success(&self) -> bool {
        self.status == PageStatus::Success
    }
}

/// Mutable traversal state for one crawl request
///
/// All budget accounting lives here so the guard checks are plain method
/// calls, independent of any browser.
#[derive(Debug)]
pub struct CrawlJob {
    seed_url: Url,
    base_domain: String,
    limits: CrawlLimits,
    visited: HashSet<String>,
    pages: Vec<PageResult>,
    deadline: Option<Instant>,
}

impl CrawlJob {
    /// Creates a job for a validated seed URL
    ///
    /// # Arguments
    ///
    /// * `seed_url` - Absolute URL the crawl starts from
    /// * `limits` - Page, depth, and fan-out budgets
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlJob)` - Fresh job with an empty visited set
    /// * `Err(SiteglassError::InvalidSeed)` - The seed has no usable host
    pub fn new(seed_url: Url, limits: CrawlLimits) -> Result<Self, SiteglassError> {
        let base_domain = extract_host(&seed_url).ok_or_else(|| SiteglassError::InvalidSeed {
            url: seed_url.to_string(),
            reason: UrlError::MissingHost.to_string(),
        })?;

        Ok(Self {
            seed_url,
            base_domain,
            limits,
            visited: HashSet::new(),
            pages: Vec::new(),
            deadline: None,
        })
    }

    /// Sets the wall-clock deadline checked between pages
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn seed_url(&self) -> &Url {
        &self.seed_url
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    pub fn limits(&self) -> CrawlLimits {
        self.limits
    }

    /// Returns true once the job deadline has passed
    pub fn deadline_exceeded(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Returns true once the page budget is spent
    pub fn budget_exhausted(&self) -> bool {
        self.pages.len() >= self.limits.max_pages
    }

    /// Returns true if a URL at the given depth may still be attempted
    pub fn should_visit(&self, url: &Url, depth: usize) -> bool {
        depth <= self.limits.max_depth
            && !self.budget_exhausted()
            && !self.visited.contains(url.as_str())
    }

    /// Marks a URL as dispatched; returns false if it already was
    ///
    /// Marking happens before the asynchronous fetch is issued, so a URL
    /// discovered through multiple parents is only ever attempted once.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    /// Appends a page outcome; success and failure both spend budget
    pub fn record(&mut self, result: PageResult) {
        self.pages.push(result);
    }

    pub fn pages(&self) -> &[PageResult] {
        &self.pages
    }

    /// Consumes the job, yielding results in visitation order
    pub fn into_pages(self) -> Vec<PageResult> {
        self.pages
    }
}
