//! URL cleaning and same-site checks

use url::Url;

use crate::errors::AllycatError;
use crate::errors::Result;

/// Paths longer than this are treated as scraped text rather than links
const MAX_PATH_LEN: usize = 500;

/// Raw pieces of an absolute URL, kept as written
#[derive(Debug, PartialEq, Eq)]
struct RawUrl<'a> {
    scheme: &'a str,
    netloc: &'a str,
    path: &'a str,
    query: Option<&'a str>,
}

fn split_raw(url: &str) -> Option<RawUrl<'_>> {
    let (scheme, rest) = url.split_once("://")?;
    let rest = rest.split('#').next().unwrap_or_default();
    let (before_query, query) = match rest.split_once('?') {
        Some((head, q)) => (head, Some(q)),
        None => (rest, None),
    };
    let (netloc, path) = match before_query.find('/') {
        Some(idx) => before_query.split_at(idx),
        None => (before_query, ""),
    };
    Some(RawUrl {
        scheme,
        netloc,
        path,
        query: query.filter(|q| !q.is_empty()),
    })
}

/// Host (and port, when present) of a URL, as used for same-site checks
///
/// The host is lowercased, userinfo is dropped and a default port is omitted.
pub fn site_domain(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    domain_of(&parsed).ok_or_else(|| AllycatError::CrawlError(format!("URL has no host: {url}")))
}

fn domain_of(parsed: &Url) -> Option<String> {
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Clean a discovered URL, or reject it
///
/// Whitespace and non-breaking spaces are removed, only `http`/`https` URLs
/// are accepted, overlong paths or paths with spaces are rejected, and path
/// segments repeating the site domain are dropped. The fragment is discarded.
pub fn clean_url(url: &str, domain: &str) -> Option<String> {
    let url = url.trim().replace('\u{a0}', "");

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return None;
    }

    let raw = split_raw(&url)?;
    if raw.path.len() > MAX_PATH_LEN || raw.path.contains(' ') {
        return None;
    }

    let clean_path = raw
        .path
        .split('/')
        .filter(|part| domain.is_empty() || !part.contains(domain))
        .collect::<Vec<_>>()
        .join("/");

    let mut cleaned = format!("{}://{}{}", raw.scheme, raw.netloc, clean_path);
    if let Some(query) = raw.query {
        cleaned.push('?');
        cleaned.push_str(query);
    }
    Some(cleaned)
}

/// Whether `url` is on the crawled site
///
/// `domain` is expected in the form returned by [`site_domain`].
pub fn is_same_domain(url: &str, domain: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|parsed| domain_of(&parsed))
        .is_some_and(|host| host == domain)
}

/// Resolve a link found on `base` into an absolute URL
pub fn resolve_link(base: &Url, href: &str) -> Option<String> {
    base.join(href.trim()).ok().map(String::from)
}
