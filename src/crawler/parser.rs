//! HTML parser for page text, anchors and images
//!
//! This module handles parsing HTML content to extract:
//! - Page title and cleaned readable text
//! - Anchor targets (for frontier expansion and link auditing)
//! - Image tags (for image auditing)
//!
//! Everything here is synchronous and returns owned data, so no parsed
//! document is ever held across an `.await`.

use crate::url::{in_scope, normalize_url};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Title used when a page has no `<title>` element
pub const NO_TITLE: &str = "No title found";

/// Maximum number of characters of cleaned text kept per page
pub const CONTENT_CHAR_LIMIT: usize = 10_000;

/// Appended to text cut at `CONTENT_CHAR_LIMIT`
pub const TRUNCATION_MARKER: &str = "... [content truncated]";

/// Elements whose text is boilerplate rather than page content
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "nav", "header", "footer", "aside"];

/// Href prefixes that never point at a fetchable page
const SKIPPED_HREF_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "#"];

/// Link targets with these path extensions are files, not pages
const NON_PAGE_EXTENSIONS: &[&str] = &[".pdf", ".jpg", ".png", ".doc", ".docx", ".zip"];

/// Readable information extracted from an HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title, or `NO_TITLE`
    pub title: String,

    /// Whitespace-collapsed text, capped at `CONTENT_CHAR_LIMIT` characters
    pub content: String,

    /// Whitespace-separated word count of `content`
    pub word_count: usize,
}

/// An `<a href>` element that passed the href exclusion rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// The raw href attribute value
    pub href: String,

    /// Whitespace-collapsed anchor text
    pub text: String,
}

/// An `<img src>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag {
    pub src: String,
    pub class: Option<String>,
    pub alt: Option<String>,
}

/// Parses HTML content and extracts its title and readable text
///
/// Script, style, nav, header, footer and aside subtrees are skipped so
/// boilerplate does not pollute the text.
///
/// # Example
///
/// ```
/// use site_auditor::crawler::parse_page;
///
/// let html = r#"<html><head><title>Test</title></head>
///     <body><nav>Menu</nav><p>Hello   world</p></body></html>"#;
/// let parsed = parse_page(html);
/// assert_eq!(parsed.title, "Test");
/// assert_eq!(parsed.content, "Test Hello world");
/// assert_eq!(parsed.word_count, 3);
/// ```
pub fn parse_page(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    let title = extract_title(&document).unwrap_or_else(|| NO_TITLE.to_string());
    let content = truncate_content(&extract_text(&document));
    let word_count = content.split_whitespace().count();

    ParsedPage {
        title,
        content,
        word_count,
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the document text, skipping non-content elements, single-spaced
fn extract_text(document: &Html) -> String {
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !NON_CONTENT_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

/// Caps text at `CONTENT_CHAR_LIMIT` characters, appending the truncation marker
fn truncate_content(text: &str) -> String {
    match text.char_indices().nth(CONTENT_CHAR_LIMIT) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// Truncates a string to at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Collects every anchor whose href passes the exclusion rules
///
/// **Exclude:** empty hrefs and hrefs starting with `javascript:`,
/// `mailto:`, `tel:` or `#`.
pub fn collect_anchors(html: &str) -> Vec<Anchor> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            if is_skipped_href(href) {
                return None;
            }

            let text = element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");

            Some(Anchor {
                href: href.to_string(),
                text,
            })
        })
        .collect()
}

/// Collects every `<img>` element with a non-empty `src`
pub fn collect_images(html: &str) -> Vec<ImageTag> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("img[src]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let attrs = element.value();
            let src = attrs.attr("src")?.trim();
            if src.is_empty() {
                return None;
            }

            Some(ImageTag {
                src: src.to_string(),
                class: attrs.attr("class").map(str::to_string),
                alt: attrs.attr("alt").map(str::to_string),
            })
        })
        .collect()
}

fn is_skipped_href(href: &str) -> bool {
    href.is_empty()
        || SKIPPED_HREF_PREFIXES
            .iter()
            .any(|prefix| href.starts_with(prefix))
}

/// Resolves an href against the page URL
///
/// Returns None for targets that do not resolve to an HTTP(S) URL.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let absolute = base_url.join(href.trim()).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute),
        _ => None,
    }
}

/// Returns true if the URL path ends in a known non-page file extension
pub fn has_non_page_extension(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    NON_PAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Extracts the deduplicated, normalized in-domain page links of a page
///
/// Relative hrefs are resolved against `page_url` before scoping. Links to
/// other authorities and to non-page files are dropped. The result keeps
/// first-seen document order.
///
/// # Example
///
/// ```
/// use site_auditor::crawler::extract_links;
///
/// let html = r#"<a href="/a">A</a><a href="/a#top">A again</a>
///     <a href="https://other.com/">Other</a><a href="/doc.pdf">PDF</a>"#;
/// let links = extract_links(html, "https://example.com/", "example.com");
/// assert_eq!(links, vec!["https://example.com/a".to_string()]);
/// ```
pub fn extract_links(html: &str, page_url: &str, domain: &str) -> Vec<String> {
    let Ok(base_url) = Url::parse(page_url) else {
        tracing::debug!("Cannot resolve links against unparseable page URL {}", page_url);
        return Vec::new();
    };

    let mut seen = HashSet::new();
    collect_anchors(html)
        .into_iter()
        .filter_map(|anchor| resolve_link(&anchor.href, &base_url))
        .filter(|absolute| in_scope(absolute.as_str(), domain))
        .filter(|absolute| !has_non_page_extension(absolute))
        .map(|absolute| normalize_url(absolute.as_str()))
        .filter(|normalized| seen.insert(normalized.clone()))
        .collect()
}
