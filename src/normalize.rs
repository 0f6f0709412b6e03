// src/normalize.rs
// =============================================================================
// This module turns any URL string into its canonical form.
//
// Two URLs are "the same page" only if their canonical strings are equal, so
// everything the crawler deduplicates goes through normalize() first.
//
// Rules:
// - No scheme given -> assume http://
// - Drop the #fragment and the whole ?query
// - Drop user:password@ from the authority (host and port are kept)
// - Resolve "." and ".." path segments
// - Lowercase the host and drop default ports (the url crate does this)
// - Drop trailing slashes; the bare origin is written without one
//
// normalize() is pure and idempotent: normalize(normalize(x)) == normalize(x)
// =============================================================================

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use url::Url;

// A URL that has been through normalize()
//
// The inner String is private, so the only way to get a CanonicalUrl is by
// normalizing something. Ord is plain string order, which is what the final
// result lists are sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // True if `other` is this URL or lives underneath it
    //
    // "http://a.com" contains "http://a.com/x" but not "http://a.com.evil"
    pub fn contains(&self, other: &CanonicalUrl) -> bool {
        other.0 == self.0
            || (other.0.starts_with(&self.0) && other.0[self.0.len()..].starts_with('/'))
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("URL is empty")]
    Empty,

    #[error("Invalid URL '{url}': {source}")]
    Invalid {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported scheme '{scheme}' in '{url}'")]
    UnsupportedScheme { url: String, scheme: String },
}

// Normalizes a raw URL string
//
// Examples:
//   "alexpage.com.au/"                     -> "http://alexpage.com.au"
//   "https://alexpage.com.au/home/../about" -> "https://alexpage.com.au/about"
//   "https://ds:ds@example.com/?a=1#top"    -> "https://example.com"
pub fn normalize(raw: &str) -> Result<CanonicalUrl, NormalizeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(NormalizeError::Empty);
    }

    let with_scheme = if has_explicit_scheme(raw) {
        raw.to_string()
    } else if let Some(rest) = raw.strip_prefix("//") {
        format!("http://{}", rest)
    } else {
        format!("http://{}", raw)
    };

    let mut url = Url::parse(&with_scheme).map_err(|source| NormalizeError::Invalid {
        url: raw.to_string(),
        source,
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(NormalizeError::UnsupportedScheme {
            url: raw.to_string(),
            scheme: url.scheme().to_string(),
        });
    }

    url.set_fragment(None);
    url.set_query(None);
    // Both only fail for URLs that cannot have credentials, which http(s)
    // URLs always can
    let _ = url.set_username("");
    let _ = url.set_password(None);

    // With query and fragment gone the serialization ends with the path,
    // so trimming the string trims the path. The host never ends in '/'.
    let canonical = url.as_str().trim_end_matches('/').to_string();

    Ok(CanonicalUrl(canonical))
}

// True if `raw` starts with "scheme://"
//
// Only the text before the first "://" counts, so a URL sitting in the query
// ("example.com/login?next=http://x") doesn't make the whole string look
// like it already has a scheme.
fn has_explicit_scheme(raw: &str) -> bool {
    match raw.split_once("://") {
        Some((scheme, _)) => {
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a newtype (struct CanonicalUrl(String))?
//    - A plain String could be raw href text or a normalized URL
//    - The compiler can't tell them apart, so mix-ups slip through
//    - Wrapping it means "this has been normalized" is part of the type
//
// 2. What does #[serde(transparent)] do?
//    - Serializes CanonicalUrl exactly like its inner String
//    - So the JSON output is ["http://a.com"] and not [{"0": "..."}]
//
// 3. Why `let _ = url.set_username("")`?
//    - set_username returns Result<(), ()>
//    - It can only fail for URLs like mailto: that have no host
//    - We already rejected those, so we ignore the result on purpose
// -----------------------------------------------------------------------------
