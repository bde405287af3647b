//! Pure content extraction from rendered HTML
//!
//! Everything in this module is a function from an HTML string to plain
//! data, so it is tested without any browser. The browser adapter in
//! `fetcher` only supplies the rendered markup.

use crate::crawler::job::ImageRef;
use crate::url::resolve_candidate;
use scraper::{Html, Selector};
use std::collections::{BTreeMap, HashSet};
use url::Url;

/// Cap on qualifying paragraphs kept per page
pub const MAX_PARAGRAPHS: usize = 10;

/// Cap on images kept per page
pub const MAX_IMAGES: usize = 5;

/// Headings longer than this are discarded as non-headline text
pub const HEADING_MAX_CHARS: usize = 500;

/// Paragraphs must be strictly longer than this
pub const PARAGRAPH_MIN_CHARS: usize = 20;

/// Paragraphs must be strictly shorter than this
pub const PARAGRAPH_MAX_CHARS: usize = 1000;

/// Length of the visible-text sample kept per page
pub const CONTENT_SAMPLE_CHARS: usize = 1000;

/// Cap on outbound links handed back per page, applied before the
/// controller's own fan-out cap
pub const PAGE_LINK_CAP: usize = 2;

/// Structured content pulled from one loaded page
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub title: String,
    pub description: String,
    pub main_heading: String,
    pub headings: BTreeMap<String, Vec<String>>,
    pub paragraphs: Vec<String>,
    pub images: Vec<ImageRef>,
    pub main_content: String,
}

/// Extracts structured content from rendered HTML
///
/// # Extraction Rules
///
/// - Title: `<title>` text, empty string if absent
/// - Description: `meta[name=description]`, falling back to
///   `meta[property=og:description]`
/// - Main heading: first `<h1>` text, trimmed
/// - Headings: per level h1-h6, trimmed, non-empty, at most
///   [`HEADING_MAX_CHARS`] characters
/// - Paragraphs: trimmed `<p>` text strictly between
///   [`PARAGRAPH_MIN_CHARS`] and [`PARAGRAPH_MAX_CHARS`] characters,
///   first [`MAX_PARAGRAPHS`] in document order
/// - Images: first [`MAX_IMAGES`] `<img>` elements as `{src, alt}`,
///   missing attributes become empty strings
/// - Main content: first [`CONTENT_SAMPLE_CHARS`] characters of visible
///   body text (script/style/noscript excluded)
pub fn extract_content(html: &str) -> PageContent {
    let document = Html::parse_document(html);

    PageContent {
        title: extract_title(&document),
        description: extract_description(&document),
        main_heading: extract_main_heading(&document),
        headings: extract_headings(&document),
        paragraphs: extract_paragraphs(&document),
        images: extract_images(&document),
        main_content: extract_main_content(&document),
    }
}

/// Discovers same-domain traversal candidates in rendered HTML
///
/// Every `a[href]` is resolved against `page_url` and filtered through the
/// crawl link policy. Duplicates are collapsed in document order and the
/// result is capped at [`PAGE_LINK_CAP`] links.
///
/// # Arguments
///
/// * `html` - The rendered page markup
/// * `page_url` - The URL the markup was loaded from
/// * `base_domain` - The job's base hostname
pub fn discover_links(html: &str, page_url: &Url, base_domain: &str) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if links.len() >= PAGE_LINK_CAP {
                break;
            }

            let Some(href) = element.value().attr("href") else {
                continue;
            };

            if let Some(resolved) = resolve_candidate(href, page_url, base_domain) {
                if seen.insert(resolved.as_str().to_string()) {
                    links.push(resolved);
                }
            }
        }
    }

    links
}

fn extract_title(document: &Html) -> String {
    select_first_text(document, "title").unwrap_or_default()
}

fn extract_description(document: &Html) -> String {
    meta_content(document, "meta[name='description']")
        .or_else(|| meta_content(document, "meta[property='og:description']"))
        .unwrap_or_default()
}

fn extract_main_heading(document: &Html) -> String {
    select_first_text(document, "h1").unwrap_or_default()
}

fn extract_headings(document: &Html) -> BTreeMap<String, Vec<String>> {
    let mut headings = BTreeMap::new();

    for level in 1..=6 {
        let tag = format!("h{}", level);
        let Ok(selector) = Selector::parse(&tag) else {
            continue;
        };

        let texts: Vec<String> = document
            .select(&selector)
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty() && text.chars().count() <= HEADING_MAX_CHARS)
            .collect();

        if !texts.is_empty() {
            headings.insert(tag, texts);
        }
    }

    headings
}

fn extract_paragraphs(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("p") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| {
            let chars = text.chars().count();
            chars > PARAGRAPH_MIN_CHARS && chars < PARAGRAPH_MAX_CHARS
        })
        .take(MAX_PARAGRAPHS)
        .collect()
}

fn extract_images(document: &Html) -> Vec<ImageRef> {
    let Ok(selector) = Selector::parse("img") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .take(MAX_IMAGES)
        .map(|element| ImageRef {
            src: element.value().attr("src").unwrap_or("").to_string(),
            alt: element.value().attr("alt").unwrap_or("").to_string(),
        })
        .collect()
}

/// Collects visible body text, skipping script/style/noscript content
fn extract_main_content(document: &Html) -> String {
    let Ok(selector) = Selector::parse("body") else {
        return String::new();
    };
    let Some(body) = document.select(&selector).next() else {
        return String::new();
    };

    let mut words = Vec::new();
    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let parent_tag = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| e.name().to_string()));
        if matches!(
            parent_tag.as_deref(),
            Some("script") | Some("style") | Some("noscript")
        ) {
            continue;
        }

        words.extend(text.split_whitespace().map(|w| w.to_string()));
    }

    let joined = words.join(" ");
    joined.chars().take(CONTENT_SAMPLE_CHARS).collect()
}

fn select_first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}
