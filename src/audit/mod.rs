//! Page audits run against the raw markup of each visited page
//!
//! - `links`: broken hyperlink detection (404/410 or unreachable)
//! - `images`: oversized image detection with banner-aware thresholds
//! - `banner`: the banner classifier chain and dimension measurement

pub mod banner;
pub mod images;
pub mod links;

pub use banner::{classify, BannerClassification, ImageCandidate};
pub use images::{audit_images, BANNER_THRESHOLD_KB, REGULAR_THRESHOLD_KB};
pub use links::audit_links;
