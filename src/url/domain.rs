use crate::url::normalize_url;
use crate::{UrlError, UrlResult};
use url::{Position, Url};

/// Returns the authority component (`[userinfo@]host[:port]`) of a parsed URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_auditor::url::authority;
///
/// let url = Url::parse("http://127.0.0.1:8080/path").unwrap();
/// assert_eq!(authority(&url), "127.0.0.1:8080");
///
/// let url = Url::parse("https://Blog.Example.com/").unwrap();
/// assert_eq!(authority(&url), "blog.example.com");
/// ```
pub fn authority(url: &Url) -> &str {
    &url[Position::BeforeUsername..Position::AfterPort]
}

/// Normalizes a URL string and extracts its authority
///
/// # Returns
///
/// * `Ok(String)` - The non-empty authority of the normalized URL
/// * `Err(UrlError)` - The URL does not parse, or has no authority
pub fn authority_of(url_str: &str) -> UrlResult<String> {
    let normalized = normalize_url(url_str);
    let url = Url::parse(&normalized).map_err(|e| UrlError::Parse(e.to_string()))?;

    match authority(&url) {
        "" => Err(UrlError::MissingAuthority(normalized)),
        value => Ok(value.to_string()),
    }
}

/// Decides whether a discovered URL belongs to the crawl's domain
///
/// The URL's authority must equal `domain` exactly: subdomains are not
/// folded in and the scheme is ignored. Unparseable URLs are out of scope.
///
/// # Examples
///
/// ```
/// use site_auditor::url::in_scope;
///
/// assert!(in_scope("https://example.com/about", "example.com"));
/// assert!(in_scope("http://example.com/about", "example.com"));
/// assert!(!in_scope("https://blog.example.com/", "example.com"));
/// assert!(!in_scope("not a url", "example.com"));
/// ```
pub fn in_scope(url: &str, domain: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => authority(&parsed) == domain,
        Err(_) => false,
    }
}
