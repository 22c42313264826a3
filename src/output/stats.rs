//! Statistics over a finished crawl
//!
//! This module summarizes a list of page results: how many pages were
//! analyzed, how many failed, and how many defects each audit turned up.

use crate::output::types::{PageResult, ThresholdCategory};
use std::collections::BTreeMap;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditStatistics {
    /// Number of pages visited
    pub total_pages: usize,

    /// Pages that returned HTML with a success status
    pub analyzed_pages: usize,

    /// Pages that answered with a non-HTML content type
    pub non_html_pages: usize,

    /// Pages whose fetch failed without an HTTP response
    pub failed_fetches: usize,

    /// Count of pages by HTTP status code (0 = fetch failure)
    pub pages_by_status: BTreeMap<u16, usize>,

    /// Sum of word counts across all pages
    pub total_words: usize,

    /// Total in-domain links discovered
    pub total_links: usize,

    /// Total broken-link findings
    pub broken_links: usize,

    /// Large images measured against the banner threshold
    pub large_banner_images: usize,

    /// Large images measured against the regular threshold
    pub large_regular_images: usize,

    /// Sum of page load times
    pub total_load_time: Duration,
}

impl AuditStatistics {
    /// Computes statistics from page results
    pub fn from_pages(pages: &[PageResult]) -> Self {
        let mut stats = Self {
            total_pages: pages.len(),
            ..Self::default()
        };

        for page in pages {
            *stats.pages_by_status.entry(page.status_code).or_insert(0) += 1;

            if page.is_fetch_failure() {
                stats.failed_fetches += 1;
            } else if page.is_success() && !is_html(page.content_type.as_deref()) {
                stats.non_html_pages += 1;
            } else if page.is_success() {
                stats.analyzed_pages += 1;
            }

            stats.total_words += page.word_count;
            stats.total_links += page.links.len();
            stats.broken_links += page.broken_links.len();
            stats.total_load_time += page.load_time;

            for image in &page.large_images {
                match image.threshold_type {
                    ThresholdCategory::Banner => stats.large_banner_images += 1,
                    ThresholdCategory::Regular => stats.large_regular_images += 1,
                }
            }
        }

        stats
    }

    /// Total large-image findings of either category
    pub fn large_images(&self) -> usize {
        self.large_banner_images + self.large_regular_images
    }

    /// Mean page load time, zero for an empty crawl
    pub fn average_load_time(&self) -> Duration {
        match u32::try_from(self.total_pages) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(count) => self.total_load_time / count,
        }
    }
}

fn is_html(content_type: Option<&str>) -> bool {
    content_type.map(crate::crawler::is_html_content_type).unwrap_or(false)
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &AuditStatistics) {
    println!("=== Audit Statistics ===\n");

    println!("Overview:");
    println!("  Pages visited: {}", stats.total_pages);
    println!("  Pages analyzed: {}", stats.analyzed_pages);
    println!("  Non-HTML pages: {}", stats.non_html_pages);
    println!("  Failed fetches: {}", stats.failed_fetches);
    println!("  Total words: {}", stats.total_words);
    println!("  In-domain links found: {}", stats.total_links);
    println!(
        "  Average load time: {:.2}s",
        stats.average_load_time().as_secs_f64()
    );
    println!();

    println!("Pages by Status:");
    for (status, count) in &stats.pages_by_status {
        let label = if *status == 0 {
            "error".to_string()
        } else {
            status.to_string()
        };
        println!("  {}: {}", label, count);
    }
    println!();

    println!("Issues:");
    println!("  Broken links: {}", stats.broken_links);
    println!("  Large images: {}", stats.large_images());
    println!("    - Banner images over 2MB: {}", stats.large_banner_images);
    println!(
        "    - Regular images over 400KB: {}",
        stats.large_regular_images
    );
}
