//! Sitemap discovery and parsing for frontier seeding
//!
//! Seeding is best effort: every failure here degrades to "no sitemap" or
//! an empty URL list, never an error.

use crate::crawler::fetcher::HttpClients;
use sitemap::reader::{SiteMapEntity, SiteMapReader};
use std::io::Cursor;
use url::Url;

/// Conventional sitemap locations, probed in order
pub const SITEMAP_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap.php",
    "/sitemap.txt",
];

/// Entries found in one sitemap document
#[derive(Debug, Default, PartialEq, Eq)]
struct SitemapEntries {
    /// `<url><loc>` values
    pages: Vec<String>,

    /// `<sitemap><loc>` values of a sitemap index
    children: Vec<String>,
}

/// Probes the conventional sitemap paths of a site
///
/// # Returns
///
/// The first candidate answering a HEAD probe with a direct 2xx, or None.
pub async fn find_sitemap(clients: &HttpClients, base_url: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;

    for path in SITEMAP_PATHS {
        let Ok(candidate) = base.join(path) else {
            continue;
        };

        tracing::debug!("Probing sitemap candidate {}", candidate);
        if clients.probe_exists(candidate.as_str()).await {
            tracing::info!("Found sitemap at {}", candidate);
            return Some(candidate.to_string());
        }
    }

    tracing::debug!("No sitemap found for {}", base_url);
    None
}

/// Downloads a sitemap and returns every page URL it lists
///
/// Sitemap index entries are followed one level deep. Plain-text bodies
/// are read one URL per line.
pub async fn parse_sitemap(clients: &HttpClients, sitemap_url: &str) -> Vec<String> {
    let Some(body) = clients.fetch_text(sitemap_url).await else {
        tracing::warn!("Could not download sitemap {}", sitemap_url);
        return Vec::new();
    };

    let entries = parse_document(&body);
    let mut urls = entries.pages;

    for child in entries.children {
        match clients.fetch_text(&child).await {
            Some(child_body) => urls.extend(parse_document(&child_body).pages),
            None => tracing::warn!("Could not download nested sitemap {}", child),
        }
    }

    tracing::info!("Parsed {} URLs from sitemap {}", urls.len(), sitemap_url);
    urls
}

fn parse_document(body: &str) -> SitemapEntries {
    if body.trim_start().starts_with('<') {
        parse_xml(body)
    } else {
        SitemapEntries {
            pages: parse_text(body),
            children: Vec::new(),
        }
    }
}

fn parse_xml(body: &str) -> SitemapEntries {
    let mut entries = SitemapEntries::default();

    for entity in SiteMapReader::new(Cursor::new(body.as_bytes())) {
        match entity {
            SiteMapEntity::Url(url_entry) => {
                if let Some(url) = url_entry.loc.get_url() {
                    entries.pages.push(url.to_string());
                }
            }
            SiteMapEntity::SiteMap(sitemap_entry) => {
                if let Some(url) = sitemap_entry.loc.get_url() {
                    entries.children.push(url.to_string());
                }
            }
            SiteMapEntity::Err(e) => {
                tracing::debug!("Skipping malformed sitemap entry: {:?}", e);
            }
        }
    }

    entries
}

fn parse_text(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| Url::parse(line).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(|url| url.to_string())
        .collect()
}
