//! Per-crawl job context
//!
//! A `CrawlJob` owns everything one crawl mutates: the FIFO frontier, the
//! visited set and the page budget. It is created per call and passed
//! explicitly, so independent crawls can run side by side in one process.

use crate::state::CrawlPhase;
use crate::url::{authority_of, in_scope, normalize_url};
use crate::{AuditError, ConfigError};
use std::collections::{HashSet, VecDeque};

/// State of a single crawl
///
/// Invariants maintained by every method:
/// - a URL is never both visited and queued
/// - a URL is queued at most once
/// - `next_url` yields nothing once `visited_count() >= max_pages()`
#[derive(Debug, Clone)]
pub struct CrawlJob {
    base_url: String,
    domain: String,
    max_pages: usize,
    visited: HashSet<String>,
    frontier: VecDeque<String>,
    queued: HashSet<String>,
    phase: CrawlPhase,
}

impl CrawlJob {
    /// Creates a job for `base_url` and enqueues its normalized form
    ///
    /// # Errors
    ///
    /// * `AuditError::InvalidBaseUrl` - the URL has no derivable authority
    /// * `AuditError::Config` - `max_pages` is zero
    pub fn new(base_url: &str, max_pages: usize) -> Result<Self, AuditError> {
        if max_pages < 1 {
            return Err(ConfigError::Validation(format!(
                "max_pages must be >= 1, got {}",
                max_pages
            ))
            .into());
        }

        let domain = authority_of(base_url).map_err(|e| {
            tracing::debug!("Rejecting base URL {:?}: {}", base_url, e);
            AuditError::InvalidBaseUrl {
                url: base_url.to_string(),
            }
        })?;

        let normalized = normalize_url(base_url);
        let mut job = Self {
            base_url: normalized.clone(),
            domain,
            max_pages,
            visited: HashSet::new(),
            frontier: VecDeque::new(),
            queued: HashSet::new(),
            phase: CrawlPhase::Init,
        };
        job.enqueue(&normalized);

        Ok(job)
    }

    /// Normalizes and appends a URL to the frontier
    ///
    /// Returns false if the URL was already visited or queued.
    pub fn enqueue(&mut self, url: &str) -> bool {
        let normalized = normalize_url(url);
        if self.visited.contains(&normalized) || self.queued.contains(&normalized) {
            return false;
        }

        self.queued.insert(normalized.clone());
        self.frontier.push_back(normalized);
        true
    }

    /// Enqueues a URL only if it shares the job's authority
    pub fn enqueue_in_scope(&mut self, url: &str) -> bool {
        in_scope(url, &self.domain) && self.enqueue(url)
    }

    /// Pops the earliest-queued unvisited URL, if the budget allows another visit
    pub fn next_url(&mut self) -> Option<String> {
        while !self.budget_exhausted() {
            let url = self.frontier.pop_front()?;
            self.queued.remove(&url);

            if self.visited.contains(&url) {
                continue;
            }
            return Some(url);
        }
        None
    }

    /// Records a URL as visited; it can never be queued again
    pub fn mark_visited(&mut self, url: &str) {
        if self.queued.remove(url) {
            self.frontier.retain(|queued| queued != url);
        }
        self.visited.insert(url.to_string());
    }

    /// Advances the job to the next phase
    pub fn transition(&mut self, to: CrawlPhase) -> Result<(), AuditError> {
        if !self.phase.can_transition_to(to) {
            return Err(AuditError::InvalidTransition {
                from: self.phase,
                to,
            });
        }

        tracing::debug!("Crawl of {} moving {} -> {}", self.domain, self.phase, to);
        self.phase = to;
        Ok(())
    }

    /// Returns true once `max_pages` URLs have been visited
    pub fn budget_exhausted(&self) -> bool {
        self.visited.len() >= self.max_pages
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// URLs awaiting a visit, in visit order
    pub fn frontier(&self) -> impl Iterator<Item = &str> {
        self.frontier.iter().map(String::as_str)
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
}
