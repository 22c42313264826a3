//! Large image auditing
//!
//! Every unique image on a page is sized with a HEAD probe, classified as
//! banner or regular, and flagged when its declared byte size exceeds the
//! threshold for that category.

use crate::audit::banner::{classify, BannerClassification, ImageCandidate};
use crate::crawler::{collect_images, resolve_link, truncate_chars, HttpClients};
use crate::output::{LargeImageFinding, Severity, ThresholdCategory};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Regular images above this size are flagged (KB)
pub const REGULAR_THRESHOLD_KB: u64 = 400;

/// Banner images above this size are flagged (KB)
pub const BANNER_THRESHOLD_KB: u64 = 2048;

/// Alt text recorded on findings is cut to this many characters
pub const ALT_TEXT_LIMIT: usize = 100;

/// Alt text recorded when the tag has no `alt` attribute
pub const NO_ALT_TEXT: &str = "No alt text";

/// Resolves the page's `<img>` tags and drops repeats of the same image URL
pub fn collect_candidates(markup: &str, page_url: &str) -> Vec<ImageCandidate> {
    let Ok(base_url) = Url::parse(page_url) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    collect_images(markup)
        .into_iter()
        .filter_map(|tag| {
            let absolute = resolve_link(&tag.src, &base_url)?;
            Some(ImageCandidate {
                url: absolute.to_string(),
                src: tag.src,
                class: tag.class,
                alt: tag.alt,
            })
        })
        .filter(|candidate| seen.insert(candidate.url.clone()))
        .collect()
}

/// Audits every image on a page
///
/// Images whose probe fails, is not a direct 2xx, or carries no
/// Content-Length are skipped silently. `probe_delay` is slept after each
/// probe.
///
/// # Returns
///
/// Findings sorted by byte size, largest first
pub async fn audit_images(
    clients: &HttpClients,
    markup: &str,
    page_url: &str,
    probe_delay: Duration,
) -> Vec<LargeImageFinding> {
    let candidates = collect_candidates(markup, page_url);
    let mut findings = Vec::new();

    for image in &candidates {
        let size_bytes = clients.probe_content_length(&image.url).await;

        if let Some(size_bytes) = size_bytes {
            let classification = classify(clients, image, size_bytes).await;
            tracing::debug!(
                "Image {} is {} bytes (banner: {}, via {})",
                image.url,
                size_bytes,
                classification.is_banner,
                classification.method
            );

            if let Some(finding) = build_finding(image, page_url, size_bytes, &classification) {
                findings.push(finding);
            }
        }

        tokio::time::sleep(probe_delay).await;
    }

    findings.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
    findings
}

/// Applies the category threshold and builds a finding if it is exceeded
///
/// The comparison is strict: an image of exactly the threshold size passes.
pub fn build_finding(
    image: &ImageCandidate,
    page_url: &str,
    size_bytes: u64,
    classification: &BannerClassification,
) -> Option<LargeImageFinding> {
    let (threshold_type, max_allowed_kb) = if classification.is_banner {
        (ThresholdCategory::Banner, BANNER_THRESHOLD_KB)
    } else {
        (ThresholdCategory::Regular, REGULAR_THRESHOLD_KB)
    };

    if size_bytes <= max_allowed_kb * 1024 {
        return None;
    }

    let size_kb = size_bytes as f64 / 1024.0;
    let size_mb = size_kb / 1024.0;

    Some(LargeImageFinding {
        url: image.url.clone(),
        filename: filename_of(&image.url),
        size_bytes,
        size_kb: round2(size_kb),
        size_mb: round2(size_mb),
        alt_text: image
            .alt
            .as_deref()
            .map(|alt| truncate_chars(alt, ALT_TEXT_LIMIT))
            .unwrap_or_else(|| NO_ALT_TEXT.to_string()),
        found_on_page: page_url.to_string(),
        is_banner: classification.is_banner,
        detection_method: classification.method,
        dimensions: classification.dimensions,
        severity: Severity::Critical,
        threshold_type,
        max_allowed_kb,
        recommendation: recommendation(threshold_type, size_kb),
        percentage_over: percentage_over(size_kb, max_allowed_kb),
    })
}

/// `size_kb / threshold_kb * 100`, rounded half to even
pub fn percentage_over(size_kb: f64, threshold_kb: u64) -> u32 {
    (size_kb / threshold_kb as f64 * 100.0).round_ties_even() as u32
}

fn recommendation(category: ThresholdCategory, size_kb: f64) -> String {
    match category {
        ThresholdCategory::Banner => format!(
            "Banner image exceeds 2MB limit ({:.1}KB). Optimize to under 2MB.",
            size_kb
        ),
        ThresholdCategory::Regular => format!(
            "Regular image exceeds 400KB limit ({:.1}KB). Optimize to under 400KB.",
            size_kb
        ),
    }
}

/// Last path segment of the URL with any query string removed
fn filename_of(url: &str) -> String {
    let last = url.rsplit('/').next().unwrap_or(url);
    last.split('?').next().unwrap_or(last).to_string()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
