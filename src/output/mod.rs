//! Output module for exporting finished crawls
//!
//! This module handles:
//! - Writing one CSV per crawled site in the importer's expected schema
//! - Deriving per-site output paths and result filenames

mod csv_export;

pub use csv_export::{csv_path_for, export_site_map, CSV_HEADER};
