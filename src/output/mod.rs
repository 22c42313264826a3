//! Output module: crawl results and summaries
//!
//! This module holds:
//! - The immutable page result and finding types returned by a crawl
//! - Summary statistics computed over a finished crawl

pub mod stats;
mod types;

pub use stats::{print_statistics, AuditStatistics};
pub use types::{
    BrokenLinkFinding, DetectionMethod, Dimensions, LargeImageFinding, PageResult, Severity,
    ThresholdCategory,
};
