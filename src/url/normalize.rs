use std::borrow::Cow;
use url::{Position, Url};

/// Normalizes a URL into the key used for visited-set and frontier comparisons
///
/// # Normalization Steps
///
/// 1. Prepend `https://` when the input carries no scheme
/// 2. Parse into scheme, authority, path and query
/// 3. Drop the fragment
/// 4. Strip trailing slashes from the path (the root keeps its `/` when a
///    query follows)
/// 5. Split the query on `&`, sort the tokens, rejoin them
/// 6. Rebuild as `scheme://authority/path[?query]`
///
/// The query is never rewritten beyond sorting, so `?tag=a/` keeps its slash.
///
/// Normalization never fails: input that cannot be parsed is returned
/// unchanged. The function is pure and idempotent.
///
/// # Examples
///
/// ```
/// use site_auditor::url::normalize_url;
///
/// assert_eq!(
///     normalize_url("http://example.com/page/?b=2&a=1#top"),
///     "http://example.com/page?a=1&b=2"
/// );
/// assert_eq!(normalize_url("example.com/docs/"), "https://example.com/docs");
/// ```
pub fn normalize_url(url_str: &str) -> String {
    match try_normalize(url_str) {
        Some(normalized) => normalized,
        None => {
            tracing::debug!("URL normalization failed for {:?}, keeping as-is", url_str);
            url_str.to_string()
        }
    }
}

fn try_normalize(url_str: &str) -> Option<String> {
    let candidate: Cow<'_, str> = if has_scheme(url_str) {
        Cow::Borrowed(url_str)
    } else {
        Cow::Owned(format!("https://{}", url_str))
    };

    let url = Url::parse(&candidate).ok()?;

    let query = url.query().map(sort_query).filter(|q| !q.is_empty());

    let path = match url.path().trim_end_matches('/') {
        "" if query.is_some() => "/",
        trimmed => trimmed,
    };

    let mut normalized = format!(
        "{}://{}{}",
        url.scheme(),
        &url[Position::BeforeUsername..Position::AfterPort],
        path
    );

    if let Some(query) = query {
        normalized.push('?');
        normalized.push_str(&query);
    }

    Some(normalized)
}

/// Sorts raw `&`-separated query tokens lexicographically, dropping empty ones
fn sort_query(query: &str) -> String {
    let mut params: Vec<&str> = query.split('&').filter(|p| !p.is_empty()).collect();
    params.sort_unstable();
    params.join("&")
}

/// Returns true if the string starts with `scheme://`
fn has_scheme(url_str: &str) -> bool {
    match url_str.find("://") {
        Some(idx) => {
            let scheme = &url_str[..idx];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
