use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteEntry};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_sites(&config.sites)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_threads < 1 {
        return Err(ConfigError::Validation(format!(
            "max_threads must be >= 1, got {}",
            config.max_threads
        )));
    }

    // max_depth and notify_threshold accept any non-negative value

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_dir.is_empty() {
        return Err(ConfigError::Validation(
            "csv_dir cannot be empty".to_string(),
        ));
    }

    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the site list
fn validate_sites(sites: &[SiteEntry]) -> Result<(), ConfigError> {
    if sites.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[site]] entry is required".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for entry in sites {
        validate_site_name(&entry.name)?;
        validate_seed_url(&entry.url)?;

        if !names.insert(entry.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate site name '{}'",
                entry.name
            )));
        }
    }

    Ok(())
}

/// Validates a site name
///
/// Site names become SQLite table names, so they are restricted to
/// identifier characters: ASCII letters, digits, and underscores, not
/// starting with a digit.
fn validate_site_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "site name cannot be empty".to_string(),
        ));
    }

    let starts_ok = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');

    if !starts_ok || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::Validation(format!(
            "site name '{}' must contain only ASCII letters, digits, and underscores, and must not start with a digit",
            name
        )));
    }

    Ok(())
}

/// Validates a seed URL
fn validate_seed_url(seed: &str) -> Result<(), ConfigError> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use the http or https scheme",
            seed
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    Ok(())
}
