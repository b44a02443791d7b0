//! Sitemapper main entry point
//!
//! This is the command-line interface for the sitemapper crawler.

use clap::Parser;
use std::path::PathBuf;
use sitemapper::config::load_config;
use sitemapper::crawler::run_sites;
use tracing_subscriber::EnvFilter;

/// Sitemapper: a same-domain site mapping crawler
///
/// Sitemapper crawls each configured seed URL, maps the same-domain link
/// structure up to a bounded depth, and exports one CSV per site. Exported
/// CSVs can then be imported into per-site SQLite tables.
#[derive(Parser, Debug)]
#[command(name = "sitemapper")]
#[command(version = "0.1.0")]
#[command(about = "A same-domain site mapping crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Import the exported CSVs into the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    import: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["import", "stats"])]
    dry_run: bool,

    /// Show per-site row counts from the database and exit
    #[arg(long, conflicts_with_all = ["import", "dry_run"])]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.import {
        handle_import(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemapper=info,warn"),
            1 => EnvFilter::new("sitemapper=debug,info"),
            2 => EnvFilter::new("sitemapper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &sitemapper::config::Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Sitemapper Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max threads: {}", config.crawler.max_threads);
    match config.crawler.max_depth {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unlimited"),
    }
    match config.crawler.notify_threshold {
        Some(threshold) => println!("  Notify threshold: {}", threshold),
        None => println!("  Notify threshold: disabled"),
    }

    println!("\nOutput:");
    println!("  CSV directory: {}", config.output.csv_dir);
    println!("  Database: {}", config.output.database_path);

    println!("\nSites ({}):", config.sites.len());
    for site in &config.sites {
        println!("  - {} -> {}", site.name, site.url);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} seed URLs", config.sites.len());

    Ok(())
}

/// Handles the --import mode: loads exported CSVs into per-site tables
fn handle_import(config: &sitemapper::config::Config) -> Result<(), Box<dyn std::error::Error>> {
    use sitemapper::output::csv_path_for;
    use sitemapper::storage::SiteDatabase;
    use std::path::Path;

    println!("=== Importing Site Maps ===\n");
    println!("Database: {}\n", config.output.database_path);

    let csv_dir = Path::new(&config.output.csv_dir);
    let mut db = SiteDatabase::open(Path::new(&config.output.database_path))?;

    for site in &config.sites {
        let csv_path = csv_path_for(csv_dir, &site.url);
        if !csv_path.exists() {
            return Err(format!(
                "no export found for site '{}': {} (run a crawl first)",
                site.name,
                csv_path.display()
            )
            .into());
        }

        let imported = db.import_site_csv(&site.name, &csv_path)?;
        println!(
            "  {} - {} rows from {}",
            site.name,
            imported,
            csv_path.display()
        );
    }

    println!("\n✓ Import complete");

    Ok(())
}

/// Handles the --stats mode: shows per-site row counts from the database
fn handle_stats(config: &sitemapper::config::Config) -> Result<(), Box<dyn std::error::Error>> {
    use sitemapper::storage::SiteDatabase;
    use std::path::Path;

    println!("Database: {}\n", config.output.database_path);

    let db = SiteDatabase::open(Path::new(&config.output.database_path))?;

    for site in &config.sites {
        match db.row_count(&site.name)? {
            Some(count) => println!("  {} - {} rows", site.name, count),
            None => println!("  {} - not imported", site.name),
        }
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &sitemapper::config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Sites to crawl: {}", config.sites.len());

    match run_sites(config).await {
        Ok(()) => {
            tracing::info!("All site crawls completed");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl run failed: {}", e);
            Err(e.into())
        }
    }
}
