/// Crawl phase definitions
///
/// A crawl moves strictly forward through `Init → Seeding → Running → Done`.
use std::fmt;

/// Represents the current phase of a crawl job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Base URL validated and enqueued
    Init,

    /// Frontier being pre-populated from a sitemap (best effort)
    Seeding,

    /// Frontier being drained page by page
    Running,

    /// Frontier empty or page budget exhausted
    Done,
}

impl CrawlPhase {
    /// Returns the phase that follows this one, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Init => Some(Self::Seeding),
            Self::Seeding => Some(Self::Running),
            Self::Running => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Returns true if moving to `to` is a legal transition
    pub fn can_transition_to(&self, to: Self) -> bool {
        self.next() == Some(to)
    }

    /// Returns true if the crawl has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Seeding => "seeding",
            Self::Running => "running",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
