//! URL handling module for Site-Auditor
//!
//! This module provides URL normalization (the dedup key for the crawl
//! frontier) and authority-based domain scoping.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{authority, authority_of, in_scope};
pub use normalize::normalize_url;
