//! Subscription lookup collaborator
//!
//! The crawl endpoint is gated on an active entitlement. The lookup itself
//! is owned by an external billing service; this module only defines the
//! seam (`SubscriptionLookup`) and the HTTP-backed production
//! implementation. A non-empty subscription list means the user may crawl.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors from the subscription collaborator
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("subscription service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("subscription service returned HTTP {status}")]
    Status { status: u16 },

    #[error("invalid subscription service URL: {0}")]
    InvalidEndpoint(String),
}

/// One subscription record as returned by the billing service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    #[serde(default)]
    pub plan: String,
}

/// Capability to look up a user's active subscriptions
#[async_trait]
pub trait SubscriptionLookup: Send + Sync {
    /// Returns the user's active subscriptions; empty means no entitlement
    async fn active_subscriptions(
        &self,
        user_id: &str,
    ) -> Result<Vec<Subscription>, SubscriptionError>;
}

/// HTTP-backed subscription lookup against the configured billing endpoint
pub struct HttpSubscriptionService {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpSubscriptionService {
    /// Builds the service client for an endpoint URL
    ///
    /// The client carries a descriptive user agent and bounded timeouts so
    /// a slow billing service cannot stall request handling indefinitely.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Absolute URL of the subscription listing endpoint
    pub fn new(endpoint: &str) -> Result<Self, SubscriptionError> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| SubscriptionError::InvalidEndpoint(e.to_string()))?;

        let client = reqwest::Client::builder()
            .user_agent(format!("siteglass/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl SubscriptionLookup for HttpSubscriptionService {
    async fn active_subscriptions(
        &self,
        user_id: &str,
    ) -> Result<Vec<Subscription>, SubscriptionError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("userId", user_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SubscriptionError::Status {
                status: response.status().as_u16(),
            });
        }

        let subscriptions = response.json::<Vec<Subscription>>().await?;
        tracing::debug!(
            "User {} has {} active subscription(s)",
            user_id,
            subscriptions.len()
        );

        Ok(subscriptions)
    }
}
