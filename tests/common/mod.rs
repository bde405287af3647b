//! Shared test doubles for the integration tests
//!
//! A fake browser provisioner serving canned HTML per URL, and a fixed
//! subscription lookup, so the full request path runs without a real
//! browser or billing service.

#![allow(dead_code)]

use async_trait::async_trait;
use siteglass::browser::{BrowserProvisioner, BrowserSession, LaunchPlan};
use siteglass::config::Config;
use siteglass::crawler::PageSource;
use siteglass::server::subscription::SubscriptionError;
use siteglass::server::{AppState, Subscription, SubscriptionLookup};
use siteglass::{Result, SiteglassError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

/// Builds a minimal HTML page with a title, heading, and links
pub fn linked_page(title: &str, hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|h| format!("<a href=\"{}\">link</a>", h))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><h1>{}</h1>\
         <p>Stable paragraph content long enough to be extracted.</p>{}</body></html>",
        title, title, anchors
    )
}

pub fn create_test_config() -> Config {
    Config::default()
}

fn fake_plan() -> LaunchPlan {
    LaunchPlan {
        executable: PathBuf::from("/usr/bin/fake-chrome"),
        args: Vec::new(),
        source: "system",
    }
}

/// Browser session backed by a canned URL-to-HTML map
pub struct FakeSession {
    pages: Arc<HashMap<String, String>>,
    plan: LaunchPlan,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl PageSource for FakeSession {
    async fn fetch_page(&self, url: &Url) -> Result<String> {
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| SiteglassError::PageLoad {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    fn plan(&self) -> &LaunchPlan {
        &self.plan
    }

    fn as_page_source(&self) -> &dyn PageSource {
        self
    }

    async fn close(self: Box<Self>) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Provisioner handing out `FakeSession`s, with call counters for asserts
#[derive(Clone)]
pub struct FakeProvisioner {
    pages: Arc<HashMap<String, String>>,
    fail_open: bool,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
}

impl FakeProvisioner {
    pub fn with_pages(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
            ),
            fail_open: false,
            opened: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A provisioner whose browser never comes up
    pub fn failing() -> Self {
        let mut provisioner = Self::with_pages(&[]);
        provisioner.fail_open = true;
        provisioner
    }

    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn session_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserProvisioner for FakeProvisioner {
    fn environment(&self) -> &'static str {
        "local"
    }

    fn binary_source(&self) -> &'static str {
        "system"
    }

    async fn launch_plan(&self) -> Result<LaunchPlan> {
        if self.fail_open {
            return Err(SiteglassError::BrowserInit(
                "fake chromium unavailable".to_string(),
            ));
        }
        Ok(fake_plan())
    }

    async fn open(&self) -> Result<Box<dyn BrowserSession>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(SiteglassError::BrowserInit(
                "fake chromium unavailable".to_string(),
            ));
        }
        Ok(Box::new(FakeSession {
            pages: Arc::clone(&self.pages),
            plan: fake_plan(),
            closed: Arc::clone(&self.closed),
        }))
    }
}

/// Subscription lookup returning a fixed answer, with a call counter
#[derive(Clone)]
pub struct FixedSubscriptions {
    subscriptions: Vec<Subscription>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl FixedSubscriptions {
    pub fn active() -> Self {
        Self {
            subscriptions: vec![Subscription {
                id: "sub-1".to_string(),
                plan: "pro".to_string(),
            }],
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn none() -> Self {
        Self {
            subscriptions: Vec::new(),
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        let mut lookup = Self::none();
        lookup.fail = true;
        lookup
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubscriptionLookup for FixedSubscriptions {
    async fn active_subscriptions(
        &self,
        _user_id: &str,
    ) -> std::result::Result<Vec<Subscription>, SubscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SubscriptionError::Status { status: 503 });
        }
        Ok(self.subscriptions.clone())
    }
}

/// Builds application state around the given fakes
pub fn test_state(provisioner: &FakeProvisioner, subscriptions: &FixedSubscriptions) -> AppState {
    AppState::with_collaborators(
        create_test_config(),
        Arc::new(provisioner.clone()),
        Arc::new(subscriptions.clone()),
    )
}
