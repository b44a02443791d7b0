//! HTTP fetcher implementation
//!
//! This module issues the page retrievals for the crawler, including:
//! - Building the shared HTTP client
//! - GET requests to fetch page bodies
//! - Raw link extraction via a single regex pass over the body
//! - Failure classification for logging

use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

/// Anchor-tag href pattern applied to page bodies
///
/// Matches double-quoted href attributes only; entities, single quotes, and
/// malformed markup are not handled.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a\s+(?:[^>]*?\s+)?href="([^"]*)""#).unwrap());

/// Result of one page retrieval
#[derive(Debug)]
pub enum FetchOutcome {
    /// Body retrieved; raw href targets in document order
    Success {
        /// Link targets exactly as written in the page
        links: Vec<String>,
    },

    /// Retrieval failed; the scheduler records an empty children list
    Failed {
        /// Why the retrieval produced nothing
        reason: FetchError,
    },
}

/// Classification of a failed retrieval
///
/// Every variant degrades to the same empty link list; the distinction only
/// feeds the log line.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("unsupported content type: {0}")]
    ContentType(String),
}

/// Builds the HTTP client shared by all crawl workers
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and extracts its raw link targets
///
/// Performs exactly one retrieval per invocation: no retries, no preflight.
/// Redirects follow the client's default policy.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// A FetchOutcome carrying either the raw targets in document order or the
/// reason the retrieval failed
pub async fn fetch_links(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            return FetchOutcome::Failed {
                reason: FetchError::Transport(e),
            }
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::Failed {
            reason: FetchError::Status(status.as_u16()),
        };
    }

    // A missing Content-Type header is treated as fetchable text
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.is_empty() && !content_type.contains("text") {
        return FetchOutcome::Failed {
            reason: FetchError::ContentType(content_type),
        };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Success {
            links: extract_links(&body),
        },
        Err(e) => FetchOutcome::Failed {
            reason: FetchError::Transport(e),
        },
    }
}

/// Extracts raw anchor href targets from a page body, in document order
pub fn extract_links(body: &str) -> Vec<String> {
    LINK_RE
        .captures_iter(body)
        .map(|cap| cap[1].to_string())
        .collect()
}
