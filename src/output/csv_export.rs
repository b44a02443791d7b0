//! CSV export of finished crawl outcomes
//!
//! One CSV is written per crawled site. The column layout is fixed: the
//! downstream importer and anything else consuming these files key on it.

use crate::crawler::CrawlOutcome;
use crate::url::netloc;
use crate::Result;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Header row written to every exported CSV
pub const CSV_HEADER: [&str; 4] = [
    "site URL",
    "processing time (seconds)",
    "number of discovered links",
    "result filename",
];

/// Derives the CSV path for a site: `{netloc}_sitemap.csv` under `csv_dir`
pub fn csv_path_for(csv_dir: &Path, seed_url: &str) -> PathBuf {
    let host = netloc(seed_url).unwrap_or_default();
    csv_dir.join(format!("{}_sitemap.csv", host))
}

/// Derives the result filename column for a visited URL
fn result_filename(url: &str) -> String {
    format!("{}_sitemap.txt", netloc(url).unwrap_or_default())
}

/// Writes a crawl outcome to a CSV file
///
/// One data row per visited URL, in claim order. The processing time column
/// is the wall-clock seconds elapsed between the URL's claim and this
/// export; the filename column is derived text and no such file is written.
///
/// # Arguments
///
/// * `outcome` - The finished crawl outcome
/// * `path` - Destination CSV path
pub fn export_site_map(outcome: &CrawlOutcome, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_writer(File::create(path)?);
    writer.write_record(CSV_HEADER)?;

    for url in &outcome.visit_order {
        let elapsed = outcome
            .timestamps
            .get(url)
            .map_or(0.0, |claimed| claimed.elapsed().as_secs_f64());
        let num_links = outcome
            .site_map
            .get(url)
            .map_or(0, |children| children.len());

        let processing = format!("{:.6}", elapsed);
        let links = num_links.to_string();
        let filename = result_filename(url);
        writer.write_record([url.as_str(), processing.as_str(), links.as_str(), filename.as_str()])?;
    }

    writer.flush()?;
    Ok(())
}
