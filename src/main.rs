//! Site-Auditor main entry point
//!
//! This is the command-line interface for the Site-Auditor website auditor.

use anyhow::Context;
use clap::Parser;
use site_auditor::config::{load_config_with_hash, validate, Config};
use site_auditor::crawler::Coordinator;
use site_auditor::output::{print_statistics, AuditStatistics};
use site_auditor::{authority_of, normalize_url, PageResult};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Auditor: a domain-scoped website auditor
///
/// Site-Auditor crawls one site breadth-first, extracts the readable text
/// of every page, and reports broken links and oversized images.
#[derive(Parser, Debug)]
#[command(name = "site-auditor")]
#[command(version = "1.0.0")]
#[command(about = "A domain-scoped website auditor", long_about = None)]
struct Cli {
    /// Base URL of the site to audit (scheme defaults to https)
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum number of pages to visit (overrides the config file)
    #[arg(short = 'n', long, value_name = "N")]
    max_pages: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Do not seed the frontier from the site's sitemap
    #[arg(long)]
    no_sitemap: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if cli.no_sitemap {
        config.crawler.use_sitemap = false;
    }
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&cli.url, &config)
    } else {
        handle_crawl(&cli.url, config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_auditor=info,warn"),
            1 => EnvFilter::new("site_auditor=debug,info"),
            2 => EnvFilter::new("site_auditor=trace,debug"),
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

/// Handles the --dry-run mode: validates inputs and shows what would be crawled
fn handle_dry_run(url: &str, config: &Config) -> anyhow::Result<()> {
    let authority = authority_of(url).with_context(|| format!("Invalid base URL: {}", url))?;

    println!("=== Site-Auditor Dry Run ===\n");

    println!("Target:");
    println!("  Seed URL: {}", normalize_url(url));
    println!("  Authority: {}", authority);

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Page delay: {}ms", config.crawler.page_delay_ms);
    println!("  Sitemap seeding: {}", config.crawler.use_sitemap);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Page timeout: {}s", config.http.page_timeout_secs);
    println!("  Probe timeout: {}s", config.http.probe_timeout_secs);

    println!("\nAudits:");
    println!("  Broken links: {}", config.audit.check_links);
    println!("  Large images: {}", config.audit.check_images);
    println!("  Probe delay: {}ms", config.audit.probe_delay_ms);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(url: &str, config: Config) -> anyhow::Result<()> {
    let max_pages = config.crawler.max_pages;
    let coordinator = Coordinator::new(config).context("Failed to build HTTP clients")?;

    let pages = coordinator
        .crawl(url, max_pages)
        .await
        .with_context(|| format!("Crawl of {} failed", url))?;

    println!();
    for page in &pages {
        print_page(page);
    }
    println!();

    print_statistics(&AuditStatistics::from_pages(&pages));

    Ok(())
}

fn print_page(page: &PageResult) {
    let status = if page.is_fetch_failure() {
        "ERR".to_string()
    } else {
        page.status_code.to_string()
    };

    println!(
        "[{}] {} - {} ({} words)",
        status, page.url, page.title, page.word_count
    );

    for link in &page.broken_links {
        println!("    broken link [{}] {}", link.status_code, link.url);
    }
    for image in &page.large_images {
        println!(
            "    large {} image {} ({:.1}KB, {}% of limit)",
            image.threshold_type, image.url, image.size_kb, image.percentage_over
        );
    }
}
