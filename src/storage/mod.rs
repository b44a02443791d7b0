//! Storage module for imported site maps
//!
//! This module handles the database side of the pipeline, including:
//! - SQLite database initialization
//! - Loading per-site CSV exports into per-site tables
//! - Row counts and row queries backing the stats report

mod schema;
mod sqlite;

pub use sqlite::SiteDatabase;

/// One imported row of a site's table
#[derive(Debug, Clone)]
pub struct SiteRow {
    pub id: i64,
    pub url: String,
    pub processing_time: f64,
    pub num_links: i64,
    pub filename: String,
}
