//! Database schema definitions
//!
//! Every configured site loads into its own table, named after the site.
//! Site names are restricted to identifier characters at config validation,
//! which is what makes interpolating them into DDL safe.

/// DDL for one site's table
///
/// The column layout mirrors the exported CSV rows, plus the autoincrement
/// key assigned at import time.
pub fn site_table_sql(site_name: &str) -> String {
    format!(
        "CREATE TABLE {} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT,
            processing_time REAL,
            num_links INTEGER,
            filename TEXT
        )",
        site_name
    )
}

/// DDL dropping a site's table if present
///
/// Imports replace a site's table wholesale, so re-importing the same CSV is
/// idempotent rather than additive.
pub fn drop_site_table_sql(site_name: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", site_name)
}
