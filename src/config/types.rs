use serde::Deserialize;

/// Main configuration structure for sitemapper
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    #[serde(default, rename = "site")]
    pub sites: Vec<SiteEntry>,
}

/// Crawl engine settings shared by every configured site
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Crawl-wide cap on concurrent page fetches
    #[serde(rename = "max-threads")]
    pub max_threads: usize,

    /// Maximum link depth followed from a seed; unlimited when absent
    #[serde(default, rename = "max-depth")]
    pub max_depth: Option<u32>,

    /// Claimed-URL count at which the one-shot notification fires
    #[serde(default, rename = "notify-threshold")]
    pub notify_threshold: Option<usize>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the per-site CSV exports
    #[serde(rename = "csv-dir")]
    pub csv_dir: String,

    /// Path to the SQLite database the importer loads into
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// One site to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    /// Short name for the site; also the database table its rows load into
    pub name: String,

    /// Absolute http/https seed URL the crawl starts from
    pub url: String,
}
