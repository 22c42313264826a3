//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and lightweight existence probes
//! - HTML parsing and link extraction
//! - Sitemap discovery for frontier seeding
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod sitemap;

pub use coordinator::Coordinator;
pub use fetcher::{
    build_http_client, fetch_page, fetch_url, is_html_content_type, FetchResult, FetchedPage,
    HttpClients,
};
pub use parser::{
    collect_anchors, collect_images, extract_links, parse_page, resolve_link, truncate_chars,
    Anchor, ImageTag, ParsedPage,
};
pub use sitemap::{find_sitemap, parse_sitemap, SITEMAP_PATHS};

use crate::config::Config;
use crate::output::PageResult;
use crate::AuditError;

/// Crawls a site with the default configuration
///
/// This is the main entry point for auditing a site. It will:
/// 1. Validate the base URL and derive the crawl's authority
/// 2. Seed the frontier from the site's sitemap, if one exists
/// 3. Visit pages breadth-first, up to `max_pages`
/// 4. Audit each HTML page for broken links and large images
///
/// # Arguments
///
/// * `base_url` - The seed URL; a missing scheme defaults to `https`
/// * `max_pages` - Hard ceiling on the number of pages visited
///
/// # Returns
///
/// * `Ok(Vec<PageResult>)` - Every visited page, in visit order
/// * `Err(AuditError)` - The base URL is unusable
pub async fn crawl(base_url: &str, max_pages: usize) -> Result<Vec<PageResult>, AuditError> {
    Coordinator::new(Config::default())?
        .crawl(base_url, max_pages)
        .await
}
