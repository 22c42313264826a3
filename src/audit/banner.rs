//! Banner image classification
//!
//! Banners get a looser size threshold than ordinary content images. An
//! image is classified by an ordered chain of rules, first match wins:
//!
//! 1. keyword in the `src` or `class` attribute
//! 2. declared size above the size heuristic
//! 3. measured pixel dimensions (wide and flat)
//!
//! The first two rules are pure and live in `BANNER_RULES`. Measurement
//! needs a bounded download and only runs when neither fires.

use crate::crawler::HttpClients;
use crate::output::{DetectionMethod, Dimensions};

/// Substrings that mark an image as a banner when found in `src` or `class`
pub const BANNER_KEYWORDS: &[&str] = &["banner", "hero", "header", "jumbotron", "cover"];

/// Images larger than this are assumed to be banners
pub const SIZE_HEURISTIC_BYTES: u64 = 800 * 1024;

/// Minimum measured width of a banner (pixels)
pub const MIN_BANNER_WIDTH: u32 = 1200;

/// Minimum measured width/height ratio of a banner
pub const MIN_BANNER_ASPECT_RATIO: f64 = 2.5;

/// At most this many bytes are downloaded to measure an image
pub const MEASURE_PREFIX_BYTES: usize = 500 * 1024;

/// An image tag resolved against its page, ready for auditing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// Absolute image URL
    pub url: String,

    /// The raw `src` attribute as written in the markup
    pub src: String,

    /// The raw `class` attribute, if any
    pub class: Option<String>,

    /// The raw `alt` attribute, if any
    pub alt: Option<String>,
}

/// Outcome of running the classifier chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BannerClassification {
    pub is_banner: bool,
    pub method: DetectionMethod,

    /// Present whenever a measurement succeeded, banner or not
    pub dimensions: Option<Dimensions>,
}

type BannerRule = (DetectionMethod, fn(&ImageCandidate, u64) -> bool);

/// Rules that need no network access, in evaluation order
const BANNER_RULES: &[BannerRule] = &[
    (DetectionMethod::Keyword, has_banner_keyword),
    (DetectionMethod::SizeHeuristic, exceeds_size_heuristic),
];

fn has_banner_keyword(image: &ImageCandidate, _size_bytes: u64) -> bool {
    let src = image.src.to_lowercase();
    let class = image.class.as_deref().unwrap_or_default().to_lowercase();

    BANNER_KEYWORDS
        .iter()
        .any(|keyword| src.contains(keyword) || class.contains(keyword))
}

fn exceeds_size_heuristic(_image: &ImageCandidate, size_bytes: u64) -> bool {
    size_bytes > SIZE_HEURISTIC_BYTES
}

/// Runs the network-free rules and returns the first that fires
pub fn classify_static(image: &ImageCandidate, size_bytes: u64) -> Option<DetectionMethod> {
    BANNER_RULES
        .iter()
        .find(|(_, rule)| rule(image, size_bytes))
        .map(|(method, _)| *method)
}

/// Classifies an image, measuring it only if the static rules do not fire
pub async fn classify(
    clients: &HttpClients,
    image: &ImageCandidate,
    size_bytes: u64,
) -> BannerClassification {
    if let Some(method) = classify_static(image, size_bytes) {
        return BannerClassification {
            is_banner: true,
            method,
            dimensions: None,
        };
    }

    let dimensions = measure_image(clients, &image.url).await;
    let is_banner = dimensions.map(|d| has_banner_shape(&d)).unwrap_or(false);

    BannerClassification {
        is_banner,
        method: if is_banner {
            DetectionMethod::Dimensions
        } else {
            DetectionMethod::None
        },
        dimensions,
    }
}

/// Downloads the start of an image and decodes its pixel dimensions
///
/// Returns None if the download or the decode fails.
pub async fn measure_image(clients: &HttpClients, url: &str) -> Option<Dimensions> {
    let prefix = clients.fetch_prefix(url, MEASURE_PREFIX_BYTES).await?;

    let dimensions = decode_dimensions(&prefix);
    if dimensions.is_none() {
        tracing::warn!("Could not decode dimensions of {}", url);
    }
    dimensions
}

/// Reads pixel dimensions from the leading bytes of an image
pub fn decode_dimensions(bytes: &[u8]) -> Option<Dimensions> {
    let size = imagesize::blob_size(bytes).ok()?;
    let width = u32::try_from(size.width).ok()?;
    let height = u32::try_from(size.height).ok()?;

    if width == 0 {
        return None;
    }

    let aspect_ratio = if height > 0 {
        (f64::from(width) / f64::from(height) * 100.0).round() / 100.0
    } else {
        0.0
    };

    Some(Dimensions {
        width,
        height,
        aspect_ratio,
    })
}

/// Returns true for wide, flat images
pub fn has_banner_shape(dimensions: &Dimensions) -> bool {
    if dimensions.height == 0 {
        return false;
    }
    let ratio = f64::from(dimensions.width) / f64::from(dimensions.height);
    dimensions.width >= MIN_BANNER_WIDTH && ratio >= MIN_BANNER_ASPECT_RATIO
}
