//! Batch crawl coordination
//!
//! This module drives a full run over the configured sites:
//! - Crawls each site's seed in turn with the shared crawl settings
//! - Exports every finished map to its per-site CSV
//! - Reports per-site progress and timing

use crate::config::Config;
use crate::crawler::{build_http_client, Scheduler};
use crate::output::{csv_path_for, export_site_map};
use crate::Result;
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use url::Url;

/// Crawls every configured site and exports each finished map
///
/// Sites are crawled one after another; concurrency applies within a site's
/// crawl, not across sites. Each site gets a fresh session, so nothing is
/// shared or cached between seeds. A site whose crawl yields nothing beyond
/// its seed still gets a CSV with that single row.
///
/// # Arguments
///
/// * `config` - The loaded and validated configuration
///
/// # Returns
///
/// * `Ok(())` - Every site was crawled and exported
/// * `Err(MapperError)` - An export or filesystem operation failed
pub async fn run_sites(config: &Config) -> Result<()> {
    let csv_dir = Path::new(&config.output.csv_dir);
    std::fs::create_dir_all(csv_dir)?;

    let client = build_http_client()?;
    tracing::info!(
        "run started at {}: {} sites to crawl",
        Utc::now().to_rfc3339(),
        config.sites.len()
    );

    for site in &config.sites {
        // Seeds were validated at config load; a parse failure here is fatal
        let seed = Url::parse(&site.url)?;

        tracing::info!("crawling site '{}' from {}", site.name, site.url);
        let start = Instant::now();

        let scheduler = Scheduler::new(client.clone(), &config.crawler);
        let outcome = scheduler.crawl(&seed).await;

        let path = csv_path_for(csv_dir, &site.url);
        export_site_map(&outcome, &path)?;

        tracing::info!(
            "site '{}': {} pages in {:?}, exported to {}",
            site.name,
            outcome.visit_order.len(),
            start.elapsed(),
            path.display()
        );
    }

    Ok(())
}
