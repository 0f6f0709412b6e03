// src/crawl/links.rs
// =============================================================================
// Turns the raw hrefs of one page into canonical URLs worth crawling.
//
// For each href:
// 1. Skip anchors and special protocols (#..., mailto:, tel:, javascript:,
//    data:)
// 2. Resolve it:
//    - "/docs"            -> site origin + "/docs"
//    - "docs"             -> current page + "/docs"
//    - "//host/docs"      -> origin's scheme + "//host/docs"
//    - "https://host/..." -> depends on LinkPolicy
// 3. Normalize, and keep it only if it lives under the site origin
//
// Relative links resolve as if the current page were a directory, so
// "child-b" on http://h/child-a becomes http://h/child-a/child-b.
// =============================================================================

use super::config::LinkPolicy;
use crate::normalize::{normalize, CanonicalUrl, NormalizeError};
use tracing::debug;
use url::Url;

const SKIPPED_PREFIXES: [&str; 5] = ["#", "mailto:", "tel:", "javascript:", "data:"];

// Links found on one page, split by whether we may fetch them
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Discovered {
    pub internal: Vec<CanonicalUrl>,
    pub external: Vec<CanonicalUrl>,
}

// What a single href turned into
#[derive(Debug, PartialEq, Eq)]
enum Resolved {
    Internal(CanonicalUrl),
    External(CanonicalUrl),
    Ignored,
}

// Applies the admission policy to every href found on `page`
pub fn discover<I>(
    hrefs: I,
    page: &CanonicalUrl,
    origin: &CanonicalUrl,
    policy: LinkPolicy,
) -> Discovered
where
    I: IntoIterator<Item = String>,
{
    let mut discovered = Discovered::default();

    for href in hrefs {
        match resolve(&href, page, origin, policy) {
            Ok(Resolved::Internal(url)) => discovered.internal.push(url),
            Ok(Resolved::External(url)) => discovered.external.push(url),
            Ok(Resolved::Ignored) => {}
            Err(e) => debug!(href = %href, page = %page, error = %e, "Dropping link"),
        }
    }

    discovered
}

fn resolve(
    href: &str,
    page: &CanonicalUrl,
    origin: &CanonicalUrl,
    policy: LinkPolicy,
) -> Result<Resolved, NormalizeError> {
    let href = href.trim();
    if href.is_empty() || SKIPPED_PREFIXES.iter().any(|p| starts_with_ignore_case(href, p)) {
        return Ok(Resolved::Ignored);
    }

    if let Some(rest) = href.strip_prefix("//") {
        let scheme = origin.as_str().split("://").next().unwrap_or("http");
        return absolute(&format!("{}://{}", scheme, rest), origin, policy);
    }

    if href.starts_with('/') {
        let url = normalize(&format!("{}{}", origin, href))?;
        return Ok(classify(url, origin));
    }

    if has_scheme(href) {
        return absolute(href, origin, policy);
    }

    // Plain relative link: treat the current page as a directory
    let base = Url::parse(&format!("{}/", page)).map_err(|source| NormalizeError::Invalid {
        url: page.to_string(),
        source,
    })?;
    let joined = base.join(href).map_err(|source| NormalizeError::Invalid {
        url: href.to_string(),
        source,
    })?;

    Ok(classify(normalize(joined.as_str())?, origin))
}

fn absolute(href: &str, origin: &CanonicalUrl, policy: LinkPolicy) -> Result<Resolved, NormalizeError> {
    match policy {
        LinkPolicy::RelativeOnly => Ok(Resolved::Ignored),
        LinkPolicy::SameOrigin => match normalize(href) {
            Ok(url) => Ok(classify(url, origin)),
            // ftp:, ws: and friends are not pages
            Err(NormalizeError::UnsupportedScheme { .. }) => Ok(Resolved::Ignored),
            Err(e) => Err(e),
        },
    }
}

fn classify(url: CanonicalUrl, origin: &CanonicalUrl) -> Resolved {
    if origin.contains(&url) {
        Resolved::Internal(url)
    } else {
        Resolved::External(url)
    }
}

// "https://x", "ftp://x", "mailto:x" all have a scheme; "child-b" and
// "a/b:c" don't
fn has_scheme(href: &str) -> bool {
    match href.split_once(':') {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && !scheme.contains('/')
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}
