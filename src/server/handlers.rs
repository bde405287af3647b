//! HTTP handlers for the scrape endpoint
//!
//! Boundary translation only: validate and normalize input, enforce the
//! subscription precondition, invoke the crawler, and map outcomes to
//! status codes. Per-page failures never surface here as errors; they are
//! data inside a 200 response.

use crate::config::CrawlerConfig;
use crate::crawler::{self, CrawlLimits};
use crate::report::{generate_report, ReportContext};
use crate::server::AppState;
use crate::url::normalize_target_url;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

/// Request body for the crawl endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub max_pages: Option<usize>,
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// Query parameters for the diagnostic GET
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(rename = "checkChromium", default)]
    pub check_chromium: Option<String>,
}

/// POST /api/scrape-anu
pub async fn scrape_site(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> (StatusCode, Json<Value>) {
    // Input validation happens before any collaborator is consulted.
    let Some(raw_url) = request.url.as_deref().filter(|u| !u.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing required field: url");
    };
    let Some(user_id) = request.user_id.as_deref().filter(|u| !u.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing required field: userId");
    };

    let seed = match normalize_target_url(raw_url) {
        Ok(url) => url,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &format!("Invalid url: {}", e));
        }
    };

    // Authorization precondition: no browser work without an entitlement.
    match state.subscriptions.active_subscriptions(user_id).await {
        Ok(subscriptions) if subscriptions.is_empty() => {
            tracing::info!("Denied scrape for {}: no active subscription", user_id);
            return error_response(
                StatusCode::PAYMENT_REQUIRED,
                "No active subscription for this user",
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!("Subscription lookup failed for {}: {}", user_id, e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Subscription lookup failed: {}", e),
            );
        }
    }

    let limits = effective_limits(&request, &state.config.crawler);
    tracing::info!(
        "Starting crawl of {} for {} (max_pages={}, max_depth={})",
        seed,
        user_id,
        limits.max_pages,
        limits.max_depth
    );

    let pages = match crawler::crawl(&state.config, state.provisioner.as_ref(), seed.clone(), limits)
        .await
    {
        Ok(pages) => pages,
        Err(e) => {
            tracing::error!("Crawl of {} failed: {}", seed, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    let base_domain = seed.host_str().unwrap_or_default().to_lowercase();
    let report = generate_report(
        &pages,
        &ReportContext {
            base_domain: base_domain.clone(),
            max_pages: limits.max_pages,
            max_depth: limits.max_depth,
            environment: state.provisioner.environment().to_string(),
            scraped_at: Utc::now(),
        },
    );

    let message = format!(
        "Scraped {} of {} attempted pages from {} ({} failed)",
        report.scraping_info.successful_pages,
        report.scraping_info.total_pages_attempted,
        base_domain,
        report.scraping_info.failed_pages
    );

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": report,
            "message": message,
        })),
    )
}

/// GET /api/scrape-anu
///
/// With `checkChromium` set, resolves the active provisioner's launch plan
/// and reports browser readiness without crawling anything. Without it,
/// this is a plain liveness message.
pub async fn scrape_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Json<Value> {
    if query.check_chromium.is_none() {
        return Json(json!({
            "success": true,
            "message": "Scraping API is running",
        }));
    }

    match state.provisioner.launch_plan().await {
        Ok(plan) => Json(json!({
            "success": true,
            "chromium": {
                "path": plan.executable,
                "status": "ready",
                "source": plan.source,
            },
        })),
        Err(e) => Json(json!({
            "success": false,
            "chromium": {
                "status": "error",
                "error": e.to_string(),
                "source": state.provisioner.binary_source(),
            },
        })),
    }
}

/// Resolves the budgets for one request
///
/// Omitted caps fall back to the server-side defaults, which are stricter
/// than anything a caller may request; supplied caps are clamped to the
/// configured ceilings.
fn effective_limits(request: &ScrapeRequest, config: &CrawlerConfig) -> CrawlLimits {
    let max_pages = request
        .max_pages
        .unwrap_or(config.default_max_pages)
        .clamp(1, config.max_pages_limit);

    let max_depth = request
        .max_depth
        .unwrap_or(config.default_max_depth)
        .min(config.max_depth_limit);

    CrawlLimits {
        max_pages,
        max_depth,
        fan_out: config.fan_out_limit,
    }
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({
            "success": false,
            "error": message,
        })),
    )
}
