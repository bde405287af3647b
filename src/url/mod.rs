//! URL handling for Siteglass
//!
//! This module holds the pure URL policy shared by the request handler and
//! the crawler: normalization of caller-supplied target URLs, host
//! extraction, and the traversal link filter.

use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a caller-supplied target URL into a crawlable absolute URL
///
/// Callers are allowed to omit the scheme (`example.com`); `https://` is
/// prepended in that case. The result must parse, use HTTP(S), and carry a
/// host.
///
/// # Arguments
///
/// * `raw` - The URL string as supplied by the caller
///
/// # Returns
///
/// * `Ok(Url)` - The normalized absolute URL
/// * `Err(UrlError)` - The input cannot be turned into a crawlable URL
///
/// # Example
///
/// ```
/// use siteglass::url::normalize_target_url;
///
/// let url = normalize_target_url("example.com").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
/// ```
pub fn normalize_target_url(raw: &str) -> UrlResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Extracts the lowercased hostname of a URL
///
/// Returns `None` for URLs without a host component.
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Resolves an anchor href into a traversal candidate
///
/// Applies the crawl link policy and returns `None` when the link must not
/// be followed:
/// - empty or fragment-only hrefs
/// - `javascript:`, `mailto:`, `tel:`, and `data:` schemes
/// - hrefs that do not resolve to an absolute URL against `page_url`
/// - non-HTTP(S) URLs after resolution
/// - URLs whose host differs from `base_domain`
///
/// Accepted candidates have their fragment stripped so that `/a` and
/// `/a#section` collapse to the same visit.
///
/// # Arguments
///
/// * `href` - The raw href attribute value
/// * `page_url` - The URL of the page the link was found on
/// * `base_domain` - The job's lowercased base hostname
pub fn resolve_candidate(href: &str, page_url: &Url, base_domain: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut resolved = page_url.join(href).ok()?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    if extract_host(&resolved)? != base_domain {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved)
}
