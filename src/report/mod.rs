//! Content report generation
//!
//! Pure aggregation of crawl results into the consumer-facing report: no
//! I/O, no clock reads. The timestamp is injected through `ReportContext`,
//! so identical inputs serialize to identical bytes.

use crate::crawler::{ImageRef, PageResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of topic words reported
const TOP_TOPIC_COUNT: usize = 5;

/// Topic words must be strictly longer than this many characters
const TOPIC_MIN_CHARS: usize = 3;

/// Length the per-page content sample is truncated to in the report
const SUMMARY_CONTENT_CHARS: usize = 500;

/// Job metadata echoed into the report
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub base_domain: String,
    pub max_pages: usize,
    pub max_depth: usize,
    pub environment: String,
    pub scraped_at: DateTime<Utc>,
}

/// The final aggregated payload returned for a completed crawl job
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentReport {
    pub scraping_info: ScrapingInfo,
    pub content_statistics: ContentStatistics,
    pub pages: Vec<PageSummary>,
    pub failed_pages: Vec<FailedPage>,
    pub website_summary: WebsiteSummary,
}

/// Counts, timestamp, and configuration echo for the whole job
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapingInfo {
    pub base_domain: String,
    pub scraped_at: DateTime<Utc>,
    pub environment: String,
    pub total_pages_attempted: usize,
    pub successful_pages: usize,
    pub failed_pages: usize,
    pub max_pages: usize,
    pub max_depth: usize,
}

/// Sums across all successful pages; failed pages contribute zero
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStatistics {
    pub total_paragraphs: usize,
    pub total_headings: usize,
    pub total_images: usize,
    pub total_content_snippets: usize,
}

/// Consumer-facing projection of one successful page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub page_info: PageInfo,
    pub content: PageContentSummary,
    pub content_metrics: ContentMetrics,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub url: String,
    pub depth: usize,
    pub title: String,
    pub description: String,
    pub main_heading: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContentSummary {
    pub headings: BTreeMap<String, Vec<String>>,
    pub paragraphs: Vec<String>,
    pub images: Vec<ImageRef>,
    pub main_content: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetrics {
    pub paragraph_count: usize,
    pub heading_count: usize,
    pub image_count: usize,
}

/// One page that could not be scraped
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedPage {
    pub url: String,
    pub depth: usize,
    pub error: String,
}

/// Coarse topic signal extracted from headings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteSummary {
    pub main_topics: Vec<String>,
}

/// Builds the content report for a finished job
///
/// Deterministic given identical `pages` and context: the partition into
/// successful and failed pages is stable, sums run in input order, and
/// the topic counter preserves first-seen order for ties.
///
/// # Arguments
///
/// * `pages` - All attempted pages in visitation order
/// * `ctx` - Job metadata, including the injected timestamp
pub fn generate_report(pages: &[PageResult], ctx: &ReportContext) -> ContentReport {
    let successful: Vec<&PageResult> = pages.iter().filter(|p| p.is_success()).collect();
    let failed: Vec<&PageResult> = pages.iter().filter(|p| !p.is_success()).collect();

    let total_paragraphs: usize = successful.iter().map(|p| p.paragraphs.len()).sum();
    let total_headings: usize = successful
        .iter()
        .map(|p| p.headings.values().map(Vec::len).sum::<usize>())
        .sum();
    let total_images: usize = successful.iter().map(|p| p.images.len()).sum();

    ContentReport {
        scraping_info: ScrapingInfo {
            base_domain: ctx.base_domain.clone(),
            scraped_at: ctx.scraped_at,
            environment: ctx.environment.clone(),
            total_pages_attempted: pages.len(),
            successful_pages: successful.len(),
            failed_pages: failed.len(),
            max_pages: ctx.max_pages,
            max_depth: ctx.max_depth,
        },
        content_statistics: ContentStatistics {
            total_paragraphs,
            total_headings,
            total_images,
            total_content_snippets: total_paragraphs + total_headings,
        },
        pages: successful.iter().map(|p| summarize_page(p)).collect(),
        failed_pages: failed
            .iter()
            .map(|p| FailedPage {
                url: p.url.clone(),
                depth: p.depth,
                error: p.error.clone().unwrap_or_default(),
            })
            .collect(),
        website_summary: WebsiteSummary {
            main_topics: extract_topics(&successful),
        },
    }
}

fn summarize_page(page: &PageResult) -> PageSummary {
    let heading_count = page.headings.values().map(Vec::len).sum();

    PageSummary {
        page_info: PageInfo {
            url: page.url.clone(),
            depth: page.depth,
            title: page.title.clone(),
            description: page.description.clone(),
            main_heading: page.main_heading.clone(),
        },
        content: PageContentSummary {
            headings: page.headings.clone(),
            paragraphs: page.paragraphs.clone(),
            images: page.images.clone(),
            main_content: truncate_with_ellipsis(&page.main_content, SUMMARY_CONTENT_CHARS),
        },
        content_metrics: ContentMetrics {
            paragraph_count: page.paragraphs.len(),
            heading_count,
            image_count: page.images.len(),
        },
    }
}

/// Truncates to `max` characters, appending an ellipsis marker when cut
fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max).collect();
    truncated.push_str("...");
    truncated
}

/// The heading-word topic heuristic
///
/// Flattens all headings of all successful pages, lowercases and
/// whitespace-splits them, counts words longer than [`TOPIC_MIN_CHARS`]
/// characters, and returns the [`TOP_TOPIC_COUNT`] most frequent. The
/// counter keeps insertion order and the sort is stable, so ties resolve
/// to first-seen order. Deliberately naive: no stop words, no stemming.
fn extract_topics(successful: &[&PageResult]) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();

    for page in successful {
        for texts in page.headings.values() {
            for text in texts {
                for word in text.to_lowercase().split_whitespace() {
                    if word.chars().count() <= TOPIC_MIN_CHARS {
                        continue;
                    }
                    match counts.iter_mut().find(|(w, _)| w.as_str() == word) {
                        Some((_, count)) => *count += 1,
                        None => counts.push((word.to_string(), 1)),
                    }
                }
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(TOP_TOPIC_COUNT)
        .map(|(word, _)| word)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{extract_content, PageResult};
    use chrono::TimeZone;
    use url::Url;

    fn test_context() -> ReportContext {
        ReportContext {
            base_domain: "example.com".to_string(),
            max_pages: 2,
            max_depth: 1,
            environment: "local".to_string(),
            scraped_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn success_page(url: &str, depth: usize, html: &str) -> PageResult {
        let parsed = Url::parse(url).unwrap();
        PageResult::success(&parsed, depth, extract_content(html))
    }

    fn failed_page(url: &str, depth: usize, error: &str) -> PageResult {
        let parsed = Url::parse(url).unwrap();
        PageResult::failed(&parsed, depth, error.to_string())
    }

    #[test]
    fn test_statistics_sum_successful_pages_only() {
        let pages = vec![
            success_page(
                "https://example.com/",
                0,
                r#"<html><body>
                    <h1>Widgets</h1><h2>Catalog</h2>
                    <p>A paragraph with a comfortable length for the report.</p>
                    <img src="/a.png">
                </body></html>"#,
            ),
            failed_page("https://example.com/broken", 1, "timeout"),
        ];

        let report = generate_report(&pages, &test_context());

        assert_eq!(report.scraping_info.total_pages_attempted, 2);
        assert_eq!(report.scraping_info.successful_pages, 1);
        assert_eq!(report.scraping_info.failed_pages, 1);
        assert_eq!(report.content_statistics.total_paragraphs, 1);
        assert_eq!(report.content_statistics.total_headings, 2);
        assert_eq!(report.content_statistics.total_images, 1);
        assert_eq!(report.content_statistics.total_content_snippets, 3);
    }

    #[test]
    fn test_failed_pages_projection() {
        let pages = vec![failed_page("https://example.com/x", 1, "navigation timeout")];
        let report = generate_report(&pages, &test_context());

        assert!(report.pages.is_empty());
        assert_eq!(report.failed_pages.len(), 1);
        assert_eq!(report.failed_pages[0].url, "https://example.com/x");
        assert_eq!(report.failed_pages[0].depth, 1);
        assert_eq!(report.failed_pages[0].error, "navigation timeout");
    }

    #[test]
    fn test_main_content_truncated_with_marker() {
        let long_body = format!("<html><body><p>{}</p></body></html>", "word ".repeat(300));
        let pages = vec![success_page("https://example.com/", 0, &long_body)];

        let report = generate_report(&pages, &test_context());
        let content = &report.pages[0].content.main_content;

        assert!(content.ends_with("..."));
        assert_eq!(content.chars().count(), SUMMARY_CONTENT_CHARS + 3);
    }

    #[test]
    fn test_short_main_content_not_marked() {
        let pages = vec![success_page(
            "https://example.com/",
            0,
            "<html><body><p>Short but valid paragraph of content.</p></body></html>",
        )];

        let report = generate_report(&pages, &test_context());
        assert!(!report.pages[0].content.main_content.ends_with("..."));
    }

    #[test]
    fn test_topic_extraction_frequency_and_length() {
        let pages = vec![success_page(
            "https://example.com/",
            0,
            r#"<html><body>
                <h1>Widgets for the web</h1>
                <h2>Widgets pricing</h2>
                <h2>Widgets and more widgets</h2>
                <h3>Pricing tiers</h3>
            </body></html>"#,
        )];

        let report = generate_report(&pages, &test_context());
        let topics = &report.website_summary.main_topics;

        // "widgets" x4, "pricing" x2; "for", "the", "web", "and" are too short
        // or singletons behind them.
        assert_eq!(topics[0], "widgets");
        assert_eq!(topics[1], "pricing");
        assert!(topics.len() <= 5);
        assert!(!topics.contains(&"the".to_string()));
        assert!(!topics.contains(&"for".to_string()));
    }

    #[test]
    fn test_topic_ties_keep_first_seen_order() {
        let pages = vec![success_page(
            "https://example.com/",
            0,
            "<html><body><h1>alpha beta gamma</h1></body></html>",
        )];

        let report = generate_report(&pages, &test_context());
        assert_eq!(
            report.website_summary.main_topics,
            vec!["alpha", "beta", "gamma"]
        );
    }

    #[test]
    fn test_report_is_deterministic() {
        let pages = vec![
            success_page(
                "https://example.com/",
                0,
                r#"<html><head><title>Home</title></head><body>
                    <h1>Widgets</h1>
                    <p>A paragraph with a comfortable length for the report.</p>
                </body></html>"#,
            ),
            failed_page("https://example.com/broken", 1, "timeout"),
        ];
        let ctx = test_context();

        let first = serde_json::to_string(&generate_report(&pages, &ctx)).unwrap();
        let second = serde_json::to_string(&generate_report(&pages, &ctx)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_report_field_naming() {
        let pages = vec![success_page(
            "https://example.com/",
            0,
            "<html><head><title>Home</title></head><body><h1>Hi</h1></body></html>",
        )];

        let value = serde_json::to_value(generate_report(&pages, &test_context())).unwrap();

        assert!(value.get("scrapingInfo").is_some());
        assert!(value.get("contentStatistics").is_some());
        assert!(value.get("failedPages").is_some());
        assert!(value["websiteSummary"].get("mainTopics").is_some());
        assert!(value["pages"][0].get("pageInfo").is_some());
        assert!(value["pages"][0].get("contentMetrics").is_some());
    }
}
