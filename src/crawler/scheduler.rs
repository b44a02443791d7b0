//! Scheduler for managing the crawl frontier and bounded dispatch
//!
//! This module runs the crawl's state machine:
//! - FIFO frontier of depth-tagged crawl tasks
//! - Claim-on-first-sight dedup through the shared session
//! - Depth eligibility decided before a child is claimed
//! - A worker pool globally capped at `max_threads`
//!
//! Every URL moves Unvisited -> Dispatched -> Resolved. A failed fetch still
//! resolves, with an empty children list; nothing a worker encounters aborts
//! the crawl.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{fetch_links, FetchOutcome};
use crate::crawler::session::{CrawlOutcome, CrawlSession};
use crate::url::{resolve_target, same_domain};
use reqwest::Client;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// A unit of crawl work: one claimed URL and the depth it was discovered at
#[derive(Debug, Clone)]
pub struct CrawlTask {
    /// The URL to fetch
    pub url: String,

    /// Zero for the seed, parent depth + 1 otherwise
    pub depth: u32,
}

/// Scheduler runs the crawl engine for one seed
///
/// The scheduler owns the frontier queue and tops up a pool of fetch workers
/// from it, never holding more than `max_threads` fetches in flight across
/// the whole crawl. Workers hand back the tasks they claimed; the crawl is
/// complete when the frontier is empty and no worker remains.
pub struct Scheduler {
    /// HTTP client shared by every worker
    client: Client,

    /// Per-run state shared with the workers
    session: Arc<CrawlSession>,

    /// Frontier queue of claimed, not-yet-fetched tasks
    frontier: VecDeque<CrawlTask>,

    /// Crawl-wide cap on in-flight fetches
    max_threads: usize,

    /// Depth past which children are no longer followed
    max_depth: Option<u32>,
}

impl Scheduler {
    /// Creates a scheduler with a fresh session for one crawl run
    pub fn new(client: Client, settings: &CrawlerConfig) -> Self {
        Self {
            client,
            session: Arc::new(CrawlSession::new(settings.notify_threshold)),
            frontier: VecDeque::new(),
            max_threads: settings.max_threads,
            max_depth: settings.max_depth,
        }
    }

    /// Crawls from the seed until the frontier drains
    ///
    /// Claims the seed, then loops: spawn workers while the frontier is
    /// non-empty and capacity remains, await the next completion, enqueue
    /// the tasks it discovered. Returns the finished outcome once the
    /// frontier is empty and the last worker has completed.
    pub async fn crawl(mut self, seed: &Url) -> CrawlOutcome {
        let seed_url = seed.to_string();
        self.session.claim(&seed_url);
        self.frontier.push_back(CrawlTask {
            url: seed_url,
            depth: 0,
        });

        let start = Instant::now();
        let mut in_flight: JoinSet<Vec<CrawlTask>> = JoinSet::new();
        let mut pages_done: usize = 0;

        loop {
            while in_flight.len() < self.max_threads {
                let Some(task) = self.frontier.pop_front() else {
                    break;
                };
                let client = self.client.clone();
                let session = Arc::clone(&self.session);
                let max_depth = self.max_depth;
                in_flight.spawn(process(client, session, max_depth, task));
            }

            match in_flight.join_next().await {
                Some(Ok(discovered)) => {
                    pages_done += 1;
                    self.frontier.extend(discovered);

                    if pages_done % 10 == 0 {
                        let rate = pages_done as f64 / start.elapsed().as_secs_f64();
                        tracing::info!(
                            "progress: {} pages fetched, {} queued, {:.2} pages/sec",
                            pages_done,
                            self.frontier.len(),
                            rate
                        );
                    }
                }
                Some(Err(e)) => {
                    tracing::error!("crawl worker failed: {}", e);
                }
                None => break,
            }
        }

        tracing::info!(
            "crawl of {} complete: {} pages in {:?}",
            seed,
            pages_done,
            start.elapsed()
        );

        self.session.finish()
    }
}

/// Fetches one claimed URL and claims its eligible children
///
/// Returns the tasks for the children this worker claimed, in discovery
/// order, for the scheduler to enqueue.
async fn process(
    client: Client,
    session: Arc<CrawlSession>,
    max_depth: Option<u32>,
    task: CrawlTask,
) -> Vec<CrawlTask> {
    tracing::info!("processing {}", task.url);

    let raw_links = match fetch_links(&client, &task.url).await {
        FetchOutcome::Success { links } => links,
        FetchOutcome::Failed { reason } => {
            tracing::warn!("fetch of {} failed: {}", task.url, reason);
            Vec::new()
        }
    };

    let children = match Url::parse(&task.url) {
        Ok(base) => filter_children(&base, &raw_links),
        Err(_) => Vec::new(),
    };

    let child_depth = task.depth + 1;
    let mut claimed = Vec::new();
    if within_depth(max_depth, child_depth) {
        for child in &children {
            if session.claim(child) {
                claimed.push(CrawlTask {
                    url: child.clone(),
                    depth: child_depth,
                });
            }
        }
    }

    session.record_children(&task.url, children);

    if let Some(count) = session.threshold_crossing() {
        tracing::info!("notification: {} URLs claimed so far", count);
    }

    claimed
}

/// Resolves raw link targets against their page and keeps the in-scope ones
///
/// Targets that cannot be resolved to an absolute URL are dropped; the rest
/// pass through the same-domain check. Order and repeats are preserved.
fn filter_children(base: &Url, raw_links: &[String]) -> Vec<String> {
    let base_str = base.as_str();
    raw_links
        .iter()
        .filter_map(|raw| resolve_target(base, raw))
        .map(|resolved| resolved.to_string())
        .filter(|child| same_domain(base_str, child))
        .collect()
}

/// Whether a task at `depth` may still be dispatched
fn within_depth(max_depth: Option<u32>, depth: u32) -> bool {
    max_depth.map_or(true, |limit| depth <= limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::build_http_client;

    fn create_test_settings() -> CrawlerConfig {
        CrawlerConfig {
            max_threads: 2,
            max_depth: None,
            notify_threshold: None,
        }
    }

    #[test]
    fn test_within_depth_unlimited() {
        assert!(within_depth(None, 0));
        assert!(within_depth(None, 999));
    }

    #[test]
    fn test_within_depth_bounded() {
        assert!(within_depth(Some(2), 0));
        assert!(within_depth(Some(2), 2));
        assert!(!within_depth(Some(2), 3));
        assert!(!within_depth(Some(0), 1));
    }

    #[test]
    fn test_filter_children_scopes_and_resolves() {
        let base = Url::parse("http://example.com/").unwrap();
        let raw = vec![
            "/a".to_string(),
            "http://other.com/b".to_string(),
            "/c".to_string(),
        ];

        assert_eq!(
            filter_children(&base, &raw),
            vec!["http://example.com/a", "http://example.com/c"]
        );
    }

    #[test]
    fn test_filter_children_drops_hostless_targets() {
        let base = Url::parse("http://example.com/").unwrap();
        let raw = vec![
            "mailto:user@example.com".to_string(),
            "javascript:void(0)".to_string(),
            "/keep".to_string(),
        ];

        assert_eq!(filter_children(&base, &raw), vec!["http://example.com/keep"]);
    }

    #[test]
    fn test_filter_children_drops_unresolvable_targets() {
        let base = Url::parse("http://example.com/").unwrap();
        let raw = vec!["http://[broken".to_string(), "/ok".to_string()];

        assert_eq!(filter_children(&base, &raw), vec!["http://example.com/ok"]);
    }

    #[test]
    fn test_filter_children_preserves_order_and_repeats() {
        let base = Url::parse("http://example.com/").unwrap();
        let raw = vec!["/z".to_string(), "/a".to_string(), "/z".to_string()];

        assert_eq!(
            filter_children(&base, &raw),
            vec![
                "http://example.com/z",
                "http://example.com/a",
                "http://example.com/z"
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_resolves_with_empty_children() {
        // Port 1 on loopback refuses connections; the crawl must still
        // complete with the seed claimed and recorded
        let client = build_http_client().unwrap();
        let scheduler = Scheduler::new(client, &create_test_settings());
        let seed = Url::parse("http://127.0.0.1:1/").unwrap();

        let outcome = scheduler.crawl(&seed).await;

        assert_eq!(outcome.site_map.len(), 1);
        assert_eq!(outcome.site_map["http://127.0.0.1:1/"], Vec::<String>::new());
        assert_eq!(outcome.timestamps.len(), 1);
        assert_eq!(outcome.visit_order, vec!["http://127.0.0.1:1/"]);
    }
}
