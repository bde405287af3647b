//! Crawl controller - budget-bounded traversal
//!
//! Drives the whole crawl as a loop over an explicit worklist of
//! `(url, depth)` pairs. All mutable state lives in the `CrawlJob`, so the
//! guard checks here are ordinary method calls and the traversal is
//! testable against any `PageSource`.

use crate::crawler::extractor;
use crate::crawler::fetcher::PageSource;
use crate::crawler::job::{CrawlJob, PageResult};
use url::Url;

/// Runs the traversal loop until budgets or the worklist are exhausted
///
/// Per worklist entry, in order:
/// 1. Stop the whole traversal if the job deadline has passed.
/// 2. Skip silently if the depth budget, page budget, or visited set says
///    the entry must not run.
/// 3. Mark the URL visited before the asynchronous fetch is issued.
/// 4. Fetch and extract; success and failure both become recorded pages.
/// 5. If depth remains, push up to `fan_out` discovered links in reverse
///    so traversal stays depth-first.
///
/// Extraction failure for one URL never aborts the job; it is recorded as
/// a failed page and traversal continues.
///
/// # Arguments
///
/// * `source` - The page source to fetch rendered HTML from
/// * `job` - The job state; seeded, mutated, and left holding all results
pub async fn run(source: &dyn PageSource, job: &mut CrawlJob) {
    let mut worklist: Vec<(Url, usize)> = vec![(job.seed_url().clone(), 0)];

    while let Some((url, depth)) = worklist.pop() {
        if job.deadline_exceeded() {
            tracing::warn!(
                "Job deadline reached with {} pages collected, stopping traversal",
                job.pages().len()
            );
            break;
        }

        if !job.should_visit(&url, depth) {
            continue;
        }

        job.mark_visited(&url);
        tracing::debug!("Visiting {} at depth {}", url, depth);

        match source.fetch_page(&url).await {
            Ok(html) => {
                let content = extractor::extract_content(&html);
                let links = extractor::discover_links(&html, &url, job.base_domain());

                job.record(PageResult::success(&url, depth, content));

                if depth < job.limits().max_depth && !job.budget_exhausted() {
                    queue_links(job, &mut worklist, links, depth + 1);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to scrape {}: {}", url, e);
                job.record(PageResult::failed(&url, depth, e.to_string()));
            }
        }
    }

    tracing::info!(
        "Crawl of {} finished: {} pages attempted",
        job.base_domain(),
        job.pages().len()
    );
}

/// Pushes discovered links onto the worklist, newest-first
///
/// Links are capped at the job's fan-out limit and pushed in reverse so
/// the first discovered link is popped (and fully explored) first.
fn queue_links(job: &CrawlJob, worklist: &mut Vec<(Url, usize)>, links: Vec<Url>, depth: usize) {
    let fan_out = job.limits().fan_out;

    for link in links.into_iter().take(fan_out).rev() {
        if job.should_visit(&link, depth) {
            worklist.push((link, depth));
        }
    }
}
