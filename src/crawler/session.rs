//! Shared per-run crawl state
//!
//! This module owns the mutable state a crawl run shares across its workers:
//! - The visited set, with the atomic claim that guards at-most-once dispatch
//! - The site map (visited URL -> children in discovery order)
//! - Per-URL claim timestamps
//! - The one-shot threshold notification flag
//!
//! All containers sit behind a single lock so a claim (membership check,
//! insert, timestamp) is one atomic step. Workers share the session through
//! an `Arc`; a page's children list is written exactly once, by the worker
//! that claimed the page, so the lock is the only synchronization needed.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Instant;

/// Final result of a crawl run
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Visited URL -> same-domain children, in discovery order
    pub site_map: HashMap<String, Vec<String>>,

    /// Visited URL -> the instant it was claimed for fetching
    pub timestamps: HashMap<String, Instant>,

    /// Visited URLs in claim order
    pub visit_order: Vec<String>,
}

#[derive(Default)]
struct SessionState {
    visited: HashSet<String>,
    site_map: HashMap<String, Vec<String>>,
    timestamps: HashMap<String, Instant>,
    visit_order: Vec<String>,
    notified: bool,
}

/// Mutable state for one crawl run, shared across workers
///
/// Created fresh per run and discarded (via [`CrawlSession::finish`]) when
/// the run completes. Nothing is carried between runs.
pub struct CrawlSession {
    state: Mutex<SessionState>,
    notify_threshold: Option<usize>,
}

impl CrawlSession {
    /// Creates an empty session
    pub fn new(notify_threshold: Option<usize>) -> Self {
        Self {
            state: Mutex::new(SessionState::default()),
            notify_threshold,
        }
    }

    /// Claims a URL for fetching
    ///
    /// Returns `true` exactly once per URL: the caller that sees `true` owns
    /// the URL's fetch and its site-map entry. The claim timestamp is
    /// recorded in the same atomic step.
    pub fn claim(&self, url: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        if !state.visited.insert(url.to_string()) {
            return false;
        }
        state.timestamps.insert(url.to_string(), Instant::now());
        state.visit_order.push(url.to_string());
        true
    }

    /// Records the filtered children of a fetched page
    ///
    /// Called once per claimed URL, by its owning worker, when the fetch
    /// completes. A failed fetch records an empty list.
    pub fn record_children(&self, url: &str, children: Vec<String>) {
        let mut state = self.state.lock().unwrap();
        state.site_map.insert(url.to_string(), children);
    }

    /// One-shot notification check
    ///
    /// Returns `Some(claimed_count)` the single time the claimed count is
    /// observed at or past the configured threshold; `None` on every other
    /// call and always when no threshold is configured. The count can
    /// overshoot the threshold when several claims land between checks.
    pub fn threshold_crossing(&self) -> Option<usize> {
        let threshold = self.notify_threshold?;
        let mut state = self.state.lock().unwrap();
        if !state.notified && state.visited.len() >= threshold {
            state.notified = true;
            return Some(state.visited.len());
        }
        None
    }

    /// Number of URLs claimed so far
    pub fn visited_count(&self) -> usize {
        self.state.lock().unwrap().visited.len()
    }

    /// Finalizes the session into the crawl outcome
    ///
    /// Called after every worker has completed; the session is left empty.
    pub fn finish(&self) -> CrawlOutcome {
        let mut state = self.state.lock().unwrap();
        CrawlOutcome {
            site_map: std::mem::take(&mut state.site_map),
            timestamps: std::mem::take(&mut state.timestamps),
            visit_order: std::mem::take(&mut state.visit_order),
        }
    }
}
