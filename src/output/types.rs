//! Page result and finding types
//!
//! These are the values the crawl hands back to its caller. They are built
//! once and never mutated; persistence is the caller's business, so every
//! type serializes as-is.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Result of visiting one URL, successful or not
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    /// The normalized URL that was fetched
    pub url: String,

    /// Page title, a fallback literal, or a description of the failure
    pub title: String,

    /// Cleaned, whitespace-collapsed text content (capped)
    pub content: String,

    /// Whitespace-separated word count of `content`
    pub word_count: usize,

    /// HTTP status code; 0 means the fetch itself failed
    pub status_code: u16,

    /// Content-Type header value, when a response was received
    pub content_type: Option<String>,

    /// Wall-clock time to fetch the page
    #[serde(serialize_with = "serialize_secs")]
    pub load_time: Duration,

    /// When the page was visited
    pub crawled_at: DateTime<Utc>,

    /// Normalized in-domain links discovered on the page
    pub links: Vec<String>,

    /// Hyperlinks on the page that turned out to be broken
    pub broken_links: Vec<BrokenLinkFinding>,

    /// Images on the page over their size threshold, largest first
    pub large_images: Vec<LargeImageFinding>,
}

impl PageResult {
    /// Returns true if the page was fetched with a success status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Returns true if the fetch never produced an HTTP response
    pub fn is_fetch_failure(&self) -> bool {
        self.status_code == 0
    }
}

/// A hyperlink that answered 404/410 or could not be reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLinkFinding {
    /// Absolute URL of the link target
    pub url: String,

    /// Final status code; 0 means a connection-level failure
    pub status_code: u16,

    /// Anchor text, truncated
    pub link_text: String,

    /// Truncated error message for connection-level failures
    pub error: Option<String>,

    /// The page the link was found on
    pub found_on_page: String,
}

/// An image whose byte size exceeds the threshold for its category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LargeImageFinding {
    pub url: String,
    pub filename: String,
    pub size_bytes: u64,
    pub size_kb: f64,
    pub size_mb: f64,
    pub alt_text: String,
    pub found_on_page: String,
    pub is_banner: bool,
    pub detection_method: DetectionMethod,
    pub dimensions: Option<Dimensions>,
    pub severity: Severity,
    pub threshold_type: ThresholdCategory,
    pub max_allowed_kb: u64,
    pub recommendation: String,
    pub percentage_over: u32,
}

/// Measured pixel dimensions of an image
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    /// width / height, rounded to two decimals; 0 when height is 0
    pub aspect_ratio: f64,
}

/// Which banner heuristic fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    Keyword,
    SizeHeuristic,
    Dimensions,
    None,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::SizeHeuristic => "size_heuristic",
            Self::Dimensions => "dimensions",
            Self::None => "none",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
}

/// Which size threshold an image was measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdCategory {
    Banner,
    Regular,
}

impl fmt::Display for ThresholdCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Banner => f.write_str("banner"),
            Self::Regular => f.write_str("regular"),
        }
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
