//! HTTP server for the scrape API
//!
//! Wires the router, shared application state, and the listener. The
//! handlers in this module are the only place where crawl outcomes are
//! translated into status codes.

mod handlers;
pub mod subscription;

pub use handlers::{ScrapeRequest, StatusQuery};
pub use subscription::{HttpSubscriptionService, Subscription, SubscriptionLookup};

use crate::browser::{provisioner_for, BrowserProvisioner};
use crate::config::Config;
use crate::{ConfigError, Result};
use axum::routing::post;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provisioner: Arc<dyn BrowserProvisioner>,
    pub subscriptions: Arc<dyn SubscriptionLookup>,
}

impl AppState {
    /// Builds production state from configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let provisioner = provisioner_for(&config);
        let subscriptions = Arc::new(HttpSubscriptionService::new(
            &config.server.subscription_url,
        )?);

        Ok(Self {
            config: Arc::new(config),
            provisioner,
            subscriptions,
        })
    }

    /// Builds state with explicit collaborators, used by tests
    pub fn with_collaborators(
        config: Config,
        provisioner: Arc<dyn BrowserProvisioner>,
        subscriptions: Arc<dyn SubscriptionLookup>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            provisioner,
            subscriptions,
        }
    }
}

/// Builds the API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/scrape-anu",
            post(handlers::scrape_site).get(handlers::scrape_status),
        )
        .with_state(state)
}

/// Runs the HTTP server until the process is stopped
///
/// # Arguments
///
/// * `config` - Validated service configuration
pub async fn serve(config: Config) -> Result<()> {
    let addr: SocketAddr = config.server.bind_addr.parse().map_err(|e| {
        ConfigError::Validation(format!("bind-addr '{}': {}", config.server.bind_addr, e))
    })?;

    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Scrape API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
