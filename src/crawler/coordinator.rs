//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that drives a `CrawlJob` through
//! its phases:
//! - `Init`: the job is created with the normalized seed enqueued
//! - `Seeding`: the frontier is pre-populated from the site's sitemap
//! - `Running`: pages are fetched, audited and mined for links, FIFO
//! - `Done`: the frontier is empty or the page budget is spent
//!
//! The loop is strictly sequential: all work for one page finishes before
//! the next URL is popped.

use crate::audit::{audit_images, audit_links};
use crate::config::Config;
use crate::crawler::fetcher::{fetch_page, HttpClients};
use crate::crawler::parser::extract_links;
use crate::crawler::sitemap::{find_sitemap, parse_sitemap};
use crate::output::PageResult;
use crate::state::{CrawlJob, CrawlPhase};
use crate::Result;
use std::time::{Duration, Instant};

/// Main crawler coordinator structure
///
/// A coordinator holds only configuration and HTTP clients. All crawl
/// state lives in the `CrawlJob` handed to `run`, so one coordinator can
/// serve any number of crawls.
#[derive(Debug, Clone)]
pub struct Coordinator {
    config: Config,
    clients: HttpClients,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The auditor configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(AuditError)` - The HTTP clients could not be built
    pub fn new(config: Config) -> Result<Self> {
        let clients = HttpClients::new(&config.http)?;
        Ok(Self { config, clients })
    }

    /// Crawls a site from `base_url`, visiting at most `max_pages` pages
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<PageResult>)` - One result per visited page, in visit order
    /// * `Err(AuditError)` - The base URL has no authority or `max_pages` is zero
    pub async fn crawl(&self, base_url: &str, max_pages: usize) -> Result<Vec<PageResult>> {
        let mut job = CrawlJob::new(base_url, max_pages)?;
        self.run(&mut job).await
    }

    /// Runs a job from `Init` to `Done`
    ///
    /// 1. Seeds the frontier from the sitemap (if enabled)
    /// 2. Pops URLs FIFO until the frontier empties or the budget is spent
    /// 3. Fetches, audits and extracts links from each page
    /// 4. Enqueues newly discovered links
    pub async fn run(&self, job: &mut CrawlJob) -> Result<Vec<PageResult>> {
        tracing::info!(
            "Starting crawl of {} (budget: {} pages)",
            job.base_url(),
            job.max_pages()
        );
        let start_time = Instant::now();

        job.transition(CrawlPhase::Seeding)?;
        if self.config.crawler.use_sitemap {
            self.seed(job).await;
        }

        job.transition(CrawlPhase::Running)?;
        let page_delay = Duration::from_millis(self.config.crawler.page_delay_ms);
        let mut pages = Vec::new();

        while let Some(url) = job.next_url() {
            tracing::info!(
                "Crawling ({}/{}): {}",
                job.visited_count() + 1,
                job.max_pages(),
                url
            );

            let page = self.visit(job, &url).await;
            job.mark_visited(&url);

            let discovered = page
                .links
                .iter()
                .filter(|link| job.enqueue(link))
                .count();
            tracing::debug!(
                "{}: {} links, {} new, {} queued",
                url,
                page.links.len(),
                discovered,
                job.frontier_len()
            );

            pages.push(page);
            tokio::time::sleep(page_delay).await;
        }

        job.transition(CrawlPhase::Done)?;
        log_totals(&pages, start_time);

        Ok(pages)
    }

    /// Enqueues every in-domain URL listed in the site's sitemap
    ///
    /// Best effort: a missing or unreadable sitemap just leaves the
    /// frontier as it was.
    async fn seed(&self, job: &mut CrawlJob) {
        let Some(sitemap_url) = find_sitemap(&self.clients, job.base_url()).await else {
            tracing::info!("No sitemap found, starting from the base URL only");
            return;
        };

        let urls = parse_sitemap(&self.clients, &sitemap_url).await;
        let seeded = urls.iter().filter(|url| job.enqueue_in_scope(url)).count();

        tracing::info!(
            "Seeded {} URLs from {} ({} listed)",
            seeded,
            sitemap_url,
            urls.len()
        );
    }

    /// Fetches one page and, if it is HTML, audits it and extracts its links
    async fn visit(&self, job: &CrawlJob, url: &str) -> PageResult {
        let fetched = fetch_page(&self.clients, url).await;

        let Some(markup) = fetched.markup else {
            return fetched.page;
        };

        let probe_delay = Duration::from_millis(self.config.audit.probe_delay_ms);

        let broken_links = if self.config.audit.check_links {
            audit_links(&self.clients, &markup, url, probe_delay).await
        } else {
            Vec::new()
        };

        let large_images = if self.config.audit.check_images {
            audit_images(&self.clients, &markup, url, probe_delay).await
        } else {
            Vec::new()
        };

        if !broken_links.is_empty() || !large_images.is_empty() {
            tracing::info!(
                "{}: {} broken links, {} large images",
                url,
                broken_links.len(),
                large_images.len()
            );
        }

        PageResult {
            links: extract_links(&markup, url, job.domain()),
            broken_links,
            large_images,
            ..fetched.page
        }
    }
}

fn log_totals(pages: &[PageResult], start_time: Instant) {
    let broken_links: usize = pages.iter().map(|p| p.broken_links.len()).sum();
    let (banner_images, regular_images) = pages
        .iter()
        .flat_map(|p| &p.large_images)
        .fold((0usize, 0usize), |(banner, regular), image| {
            if image.is_banner {
                (banner + 1, regular)
            } else {
                (banner, regular + 1)
            }
        });

    tracing::info!(
        "Crawl completed: {} pages in {:?}, {} broken links, {} large images ({} banner, {} regular)",
        pages.len(),
        start_time.elapsed(),
        broken_links,
        banner_images + regular_images,
        banner_images,
        regular_images
    );
}
