//! Site-Auditor: a domain-scoped website auditor
//!
//! This crate crawls the reachable pages of a single site breadth-first,
//! extracts readable text from each page, and flags structural defects:
//! broken hyperlinks and oversized images (with banner-aware thresholds).

pub mod audit;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Auditor operations
///
/// Only a handful of conditions are fatal to a crawl; everything that goes
/// wrong while talking to remote servers is folded into page results and
/// findings instead of surfacing here.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid crawl phase transition: {from} -> {to}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing authority in URL: {0}")]
    MissingAuthority(String),
}

/// Result type alias for Site-Auditor operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator};
pub use output::{BrokenLinkFinding, LargeImageFinding, PageResult};
pub use state::{CrawlJob, CrawlPhase};
pub use crate::url::{authority_of, in_scope, normalize_url};
