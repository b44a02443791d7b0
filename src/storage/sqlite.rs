//! SQLite importer for exported site maps
//!
//! This module loads per-site CSV exports into the SQLite database, one
//! table per configured site.

use crate::storage::schema::{drop_site_table_sql, site_table_sql};
use crate::storage::SiteRow;
use crate::{MapperError, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite database holding the imported site tables
pub struct SiteDatabase {
    conn: Connection,
}

impl SiteDatabase {
    /// Opens (or creates) the database at the given path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SiteDatabase)` - Successfully opened/created database
    /// * `Err(MapperError)` - Failed to open database
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Imports one site's CSV into its table
    ///
    /// The site's table is replaced wholesale: dropped if present, recreated,
    /// then filled with one row per CSV data row in file order. The whole
    /// import runs in a single transaction, so a malformed row leaves the
    /// previous table contents untouched.
    ///
    /// # Arguments
    ///
    /// * `site_name` - Table name; must have passed config validation
    /// * `csv_path` - The exported CSV to load
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of rows imported
    /// * `Err(MapperError)` - The CSV was unreadable or a row was malformed
    pub fn import_site_csv(&mut self, site_name: &str, csv_path: &Path) -> Result<usize> {
        let mut reader = csv::Reader::from_path(csv_path)?;

        let tx = self.conn.transaction()?;
        tx.execute(&drop_site_table_sql(site_name), [])?;
        tx.execute(&site_table_sql(site_name), [])?;

        let insert_sql = format!(
            "INSERT INTO {} (url, processing_time, num_links, filename) VALUES (?1, ?2, ?3, ?4)",
            site_name
        );

        let mut imported = 0;
        for record in reader.records() {
            let record = record?;
            let (url, processing_time, num_links, filename) = parse_row(&record)?;
            tx.execute(&insert_sql, params![url, processing_time, num_links, filename])?;
            imported += 1;
        }

        tx.commit()?;
        Ok(imported)
    }

    /// Whether a site's table exists in the database
    pub fn table_exists(&self, site_name: &str) -> Result<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type='table' AND name = ?1",
                params![site_name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Number of imported rows in a site's table
    ///
    /// Returns `None` when the site has never been imported.
    pub fn row_count(&self, site_name: &str) -> Result<Option<i64>> {
        if !self.table_exists(site_name)? {
            return Ok(None);
        }

        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", site_name), [], |row| {
                    row.get(0)
                })?;
        Ok(Some(count))
    }

    /// All imported rows of a site's table, in insertion order
    pub fn site_rows(&self, site_name: &str) -> Result<Vec<SiteRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, url, processing_time, num_links, filename FROM {} ORDER BY id",
            site_name
        ))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(SiteRow {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    processing_time: row.get(2)?,
                    num_links: row.get(3)?,
                    filename: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

/// Parses one CSV data row into column values
fn parse_row(record: &csv::StringRecord) -> Result<(String, f64, i64, String)> {
    let field = |i: usize| {
        record
            .get(i)
            .ok_or_else(|| MapperError::Import(format!("row has {} columns, expected 4", record.len())))
    };

    let url = field(0)?.to_string();
    let processing_time: f64 = field(1)?
        .parse()
        .map_err(|_| MapperError::Import(format!("bad processing time '{}'", field(1).unwrap_or(""))))?;
    let num_links: i64 = field(2)?
        .parse()
        .map_err(|_| MapperError::Import(format!("bad link count '{}'", field(2).unwrap_or(""))))?;
    let filename = field(3)?.to_string();

    Ok((url, processing_time, num_links, filename))
}
