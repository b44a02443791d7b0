//! URL handling module for sitemapper
//!
//! This module provides network-location extraction, the same-domain scope
//! check that bounds every crawl, and relative-link resolution.

mod scope;

pub use scope::{netloc, resolve_target, same_domain};
