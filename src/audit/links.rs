//! Broken link auditing
//!
//! Every unique hyperlink on a page, internal or external, gets one HEAD
//! probe that follows redirects. Only a final 404 or 410, or a probe that
//! never gets an answer, produces a finding.

use crate::crawler::{collect_anchors, resolve_link, truncate_chars, HttpClients};
use crate::output::BrokenLinkFinding;
use reqwest::StatusCode;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Anchor text recorded on findings is cut to this many characters
pub const LINK_TEXT_LIMIT: usize = 100;

/// Network error messages recorded on findings are cut to this many characters
pub const ERROR_TEXT_LIMIT: usize = 100;

/// A resolved hyperlink target and the text of its first anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub url: String,
    pub text: String,
}

/// Resolves the page's anchors, keeping the first anchor per absolute URL
pub fn collect_targets(markup: &str, page_url: &str) -> Vec<LinkTarget> {
    let Ok(base_url) = Url::parse(page_url) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    collect_anchors(markup)
        .into_iter()
        .filter_map(|anchor| {
            let absolute = resolve_link(&anchor.href, &base_url)?;
            Some(LinkTarget {
                url: absolute.to_string(),
                text: anchor.text,
            })
        })
        .filter(|target| seen.insert(target.url.clone()))
        .collect()
}

/// Statuses that mark a link as broken
pub fn is_broken_status(status: StatusCode) -> bool {
    matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE)
}

/// Probes every hyperlink on a page and reports the broken ones
///
/// # Arguments
///
/// * `clients` - The crawl's HTTP clients
/// * `markup` - Raw HTML of the page
/// * `page_url` - URL the page was fetched from, used to resolve relative hrefs
/// * `probe_delay` - Pause after each probe
pub async fn audit_links(
    clients: &HttpClients,
    markup: &str,
    page_url: &str,
    probe_delay: Duration,
) -> Vec<BrokenLinkFinding> {
    let targets = collect_targets(markup, page_url);
    let mut findings = Vec::new();

    for target in &targets {
        let finding = match clients.probe_status(&target.url).await {
            Ok(status) if is_broken_status(status) => {
                tracing::debug!("Broken link {} ({})", target.url, status);
                Some(broken(target, page_url, status.as_u16(), None))
            }
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Link {} unreachable: {}", target.url, e);
                let error = truncate_chars(&e.to_string(), ERROR_TEXT_LIMIT);
                Some(broken(target, page_url, 0, Some(error)))
            }
        };

        findings.extend(finding);
        tokio::time::sleep(probe_delay).await;
    }

    findings
}

fn broken(
    target: &LinkTarget,
    page_url: &str,
    status_code: u16,
    error: Option<String>,
) -> BrokenLinkFinding {
    BrokenLinkFinding {
        url: target.url.clone(),
        status_code,
        link_text: truncate_chars(&target.text, LINK_TEXT_LIMIT),
        error,
        found_on_page: page_url.to_string(),
    }
}
