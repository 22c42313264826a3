use serde::Deserialize;

/// Browser-like client identity; naive bot filters reject obvious crawler agents
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Main configuration structure for Site-Auditor
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub audit: AuditConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Page budget used when the caller does not supply one
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Pause after each visited page (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Whether to seed the frontier from a sitemap
    #[serde(rename = "use-sitemap")]
    pub use_sitemap: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            page_delay_ms: 500,
            use_sitemap: true,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Timeout for full page and sitemap downloads (seconds)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    /// Timeout for existence probes and bounded image reads (seconds)
    #[serde(rename = "probe-timeout-secs")]
    pub probe_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_timeout_secs: 10,
            probe_timeout_secs: 5,
        }
    }
}

/// Link and image audit configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Pause between consecutive link/image probes (milliseconds)
    #[serde(rename = "probe-delay-ms")]
    pub probe_delay_ms: u64,

    /// Probe every hyperlink on each page
    #[serde(rename = "check-links")]
    pub check_links: bool,

    /// Probe every image on each page
    #[serde(rename = "check-images")]
    pub check_images: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            probe_delay_ms: 100,
            check_links: true,
            check_images: true,
        }
    }
}
