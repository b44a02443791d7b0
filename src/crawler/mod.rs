//! Crawler module for site map construction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and regex link extraction
//! - The shared per-run crawl session
//! - Frontier scheduling with bounded concurrency
//! - Batch coordination over the configured sites

mod coordinator;
mod fetcher;
mod scheduler;
mod session;

pub use coordinator::run_sites;
pub use fetcher::{build_http_client, extract_links, fetch_links, FetchError, FetchOutcome};
pub use scheduler::{CrawlTask, Scheduler};
pub use session::{CrawlOutcome, CrawlSession};

use crate::config::CrawlerConfig;
use crate::Result;
use url::Url;

/// Crawls a single seed URL to completion
///
/// This is the single-site entry point. It will:
/// 1. Parse the seed into absolute form
/// 2. Build the HTTP client
/// 3. Run the scheduler until the frontier drains
///
/// # Arguments
///
/// * `seed` - Absolute http/https URL the crawl starts from
/// * `settings` - Crawl engine settings
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The finished site map and timestamps
/// * `Err(MapperError)` - The seed did not parse or the client failed to build
pub async fn crawl(seed: &str, settings: &CrawlerConfig) -> Result<CrawlOutcome> {
    let seed = Url::parse(seed)?;
    let client = build_http_client()?;
    let scheduler = Scheduler::new(client, settings);
    Ok(scheduler.crawl(&seed).await)
}
