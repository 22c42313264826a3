//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with a browser-like user agent string
//! - GET requests to fetch page content
//! - HEAD existence probes (with and without redirect following)
//! - Bounded prefix downloads for image measurement
//! - Error classification into page results

use crate::config::HttpConfig;
use crate::crawler::parser::parse_page;
use crate::output::PageResult;
use chrono::{DateTime, Utc};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::{Duration, Instant};

/// Media types treated as HTML pages
const HTML_MEDIA_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// HTTP status code
        status_code: u16,
        /// The actual Content-Type received, if any
        content_type: Option<String>,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// Content-Type header value, if any
        content_type: Option<String>,
    },

    /// Network error (connection refused, timeout, unreadable body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// A visited page plus the raw markup the audits run against
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub page: PageResult,

    /// Raw HTML, present only for successful HTML responses
    pub markup: Option<String>,
}

/// The HTTP clients used by one crawl
///
/// Page fetches and link probes follow redirects. Image and sitemap
/// existence probes only accept a direct 2xx, so they go through a client
/// with redirects disabled. Probe clients never negotiate compression:
/// a decoded response loses its Content-Length.
#[derive(Debug, Clone)]
pub struct HttpClients {
    page: Client,
    probe: Client,
    probe_no_redirect: Client,
}

impl HttpClients {
    /// Builds all clients from the HTTP configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The HTTP configuration
    ///
    /// # Returns
    ///
    /// * `Ok(HttpClients)` - Successfully built clients
    /// * `Err(reqwest::Error)` - Failed to build a client
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let page_timeout = Duration::from_secs(config.page_timeout_secs);
        let probe_timeout = Duration::from_secs(config.probe_timeout_secs);

        Ok(Self {
            page: build_http_client(&config.user_agent, page_timeout, Policy::default(), true)?,
            probe: build_http_client(&config.user_agent, probe_timeout, Policy::default(), false)?,
            probe_no_redirect: build_http_client(
                &config.user_agent,
                probe_timeout,
                Policy::none(),
                false,
            )?,
        })
    }

    /// Client for full page and sitemap downloads
    pub fn page(&self) -> &Client {
        &self.page
    }

    /// Sends a HEAD probe following redirects and returns the final status
    pub async fn probe_status(&self, url: &str) -> Result<StatusCode, reqwest::Error> {
        let response = self.probe.head(url).send().await?;
        Ok(response.status())
    }

    /// Returns true if a HEAD probe answers 2xx without redirecting
    pub async fn probe_exists(&self, url: &str) -> bool {
        match self.probe_no_redirect.head(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Existence probe for {} failed: {}", url, e);
                false
            }
        }
    }

    /// Reads the declared byte size of a resource with a HEAD probe
    ///
    /// Returns None unless the probe answers 2xx without redirecting and
    /// carries a parseable Content-Length header.
    pub async fn probe_content_length(&self, url: &str) -> Option<u64> {
        let response = match self.probe_no_redirect.head(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Size probe for {} failed: {}", url, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Size probe for {} answered {}", url, response.status());
            return None;
        }

        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
    }

    /// Downloads at most `limit` bytes from the start of a resource
    ///
    /// Returns None on any network failure or non-success status.
    pub async fn fetch_prefix(&self, url: &str, limit: usize) -> Option<Vec<u8>> {
        let mut response = match self.probe.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!("Prefix download of {} answered {}", url, response.status());
                return None;
            }
            Err(e) => {
                tracing::debug!("Prefix download of {} failed: {}", url, e);
                return None;
            }
        };

        let mut buffer = Vec::new();
        while buffer.len() < limit {
            match response.chunk().await {
                Ok(Some(chunk)) => buffer.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!("Prefix download of {} interrupted: {}", url, e);
                    return None;
                }
            }
        }
        buffer.truncate(limit);

        Some(buffer)
    }

    /// Downloads a full text document, returning None unless it answers 2xx
    pub async fn fetch_text(&self, url: &str) -> Option<String> {
        let response = match self.page.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!("Download of {} answered {}", url, response.status());
                return None;
            }
            Err(e) => {
                tracing::debug!("Download of {} failed: {}", url, e);
                return None;
            }
        };

        response.text().await.ok()
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header value
/// * `timeout` - Total request timeout
/// * `redirect` - Redirect policy
/// * `compress` - Whether to request and decode gzip/brotli bodies
///
/// # Example
///
/// ```no_run
/// use reqwest::redirect::Policy;
/// use site_auditor::config::DEFAULT_USER_AGENT;
/// use site_auditor::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client =
///     build_http_client(DEFAULT_USER_AGENT, Duration::from_secs(10), Policy::none(), true).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &str,
    timeout: Duration,
    redirect: Policy,
    compress: bool,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(redirect)
        .gzip(compress)
        .brotli(compress)
        .build()
}

/// Returns true if a Content-Type header value names an HTML media type
///
/// Parameters such as `charset` are ignored and matching is case-insensitive.
pub fn is_html_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    HTML_MEDIA_TYPES.contains(&media_type.as_str())
}

/// Fetches a URL and classifies the response
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// A FetchResult indicating success or the type of failure
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status_code = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if !response.status().is_success() {
        return FetchResult::HttpError {
            status_code,
            content_type,
        };
    }

    let content_type = match content_type {
        Some(ct) if is_html_content_type(&ct) => ct,
        other => {
            return FetchResult::ContentMismatch {
                status_code,
                content_type: other,
            }
        }
    };

    match response.text().await {
        Ok(body) => FetchResult::Success {
            status_code,
            content_type,
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Fetches one page and turns every outcome into a `PageResult`
///
/// Never fails: network errors become a result with status 0 and an
/// `Error: ...` title. Links and findings are left empty for the
/// coordinator to fill in from `markup`.
pub async fn fetch_page(clients: &HttpClients, url: &str) -> FetchedPage {
    let crawled_at = Utc::now();
    let started = Instant::now();
    let result = fetch_url(clients.page(), url).await;
    let load_time = started.elapsed();

    match result {
        FetchResult::Success {
            status_code,
            content_type,
            body,
        } => {
            let parsed = parse_page(&body);
            let page = PageResult {
                url: url.to_string(),
                title: parsed.title,
                content: parsed.content,
                word_count: parsed.word_count,
                status_code,
                content_type: Some(content_type),
                load_time,
                crawled_at,
                links: Vec::new(),
                broken_links: Vec::new(),
                large_images: Vec::new(),
            };
            FetchedPage {
                page,
                markup: Some(body),
            }
        }
        FetchResult::ContentMismatch {
            status_code,
            content_type,
        } => {
            let title =
                format!("Non-HTML content: {}", content_type.as_deref().unwrap_or_default());
            tracing::debug!("{} is not HTML, skipping analysis", url);
            unanalysed(url, title, status_code, content_type, load_time, crawled_at)
        }
        FetchResult::HttpError {
            status_code,
            content_type,
        } => {
            tracing::debug!("{} answered HTTP {}", url, status_code);
            let title = format!("HTTP {}", status_code);
            unanalysed(url, title, status_code, content_type, load_time, crawled_at)
        }
        FetchResult::NetworkError { error } => {
            tracing::warn!("Failed to fetch {}: {}", url, error);
            let title = format!("Error: {}", error);
            unanalysed(url, title, 0, None, Duration::ZERO, crawled_at)
        }
    }
}

/// A page result with no content, links or findings
fn unanalysed(
    url: &str,
    title: String,
    status_code: u16,
    content_type: Option<String>,
    load_time: Duration,
    crawled_at: DateTime<Utc>,
) -> FetchedPage {
    FetchedPage {
        page: PageResult {
            url: url.to_string(),
            title,
            content: String::new(),
            word_count: 0,
            status_code,
            content_type,
            load_time,
            crawled_at,
            links: Vec::new(),
            broken_links: Vec::new(),
            large_images: Vec::new(),
        },
        markup: None,
    }
}
