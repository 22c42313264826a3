//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the `Init → Seeding → Running → Done` lifecycle of a crawl
//! - `CrawlJob`: frontier, visited set and page budget for one crawl

mod crawl_job;
mod crawl_phase;

// Re-export main types
pub use crawl_job::CrawlJob;
pub use crawl_phase::CrawlPhase;
