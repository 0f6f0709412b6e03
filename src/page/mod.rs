// src/page/mod.rs
// =============================================================================
// This module is everything the crawler needs to know about a single page:
// how to fetch it, how to classify the response, and how to pull links out
// of its HTML.
//
// Submodules:
// - http: Fetcher implementation on top of reqwest
// - html: LinkExtractor implementation on top of scraper
//
// The crawl engine only talks to the Fetcher and LinkExtractor traits, so
// tests can hand it an in-memory website instead of the network.
// =============================================================================

mod html;
mod http;

pub use html::HtmlLinkExtractor;
pub use http::{HttpFetcher, HttpFetcherConfig};

use async_trait::async_trait;
use thiserror::Error;

// Status line and content type of a response, without the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    pub content_type: Option<String>,
}

impl ResponseHead {
    pub fn new(status: u16, content_type: Option<&str>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    // "text/html; charset=utf-8" and "application/xhtml+xml" both count
    pub fn is_html(&self) -> bool {
        let Some(content_type) = &self.content_type else {
            return false;
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        mime == "text/html" || mime == "application/xhtml+xml"
    }

    // The one-shot classification of a response
    pub fn verdict(&self) -> Verdict {
        if !self.is_success() {
            Verdict::Failed(Failure::Status(self.status))
        } else if self.is_html() {
            Verdict::Html
        } else {
            Verdict::NotHtml(self.content_type.clone())
        }
    }
}

// A fetched page
//
// Fetchers may leave `body` empty when the head says it is not a 2xx HTML
// response; the crawler never looks at the body in that case.
#[derive(Debug, Clone)]
pub struct Page {
    pub head: ResponseHead,
    pub body: String,
}

// Where a URL ends up after it has been fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// 2xx with an HTML content type: goes to `found` and gets expanded
    Html,
    /// 2xx with any other content type: left out of both result lists
    NotHtml(Option<String>),
    /// Non-2xx or transport failure: goes to `errors`
    Failed(Failure),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("HTTP {0}")]
    Status(u16),

    #[error(transparent)]
    Transport(#[from] FetchError),
}

// Ways a request can fail before any status code comes back
//
// Mirrors the categories the link checker reports (timeout, DNS, SSL,
// redirect loops), so the crawl log says *why* a URL is in `errors`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Could not resolve hostname")]
    Dns,

    #[error("SSL certificate error")]
    Tls,

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("Connection failed")]
    Connect,

    #[error("{0}")]
    Request(String),
}

// Retrieves pages over some transport
//
// `fetch` is a full GET. `head` is an optional cheaper probe; the default
// returns Ok(None), meaning "not supported, just GET it".
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;

    async fn head(&self, _url: &str) -> Result<Option<ResponseHead>, FetchError> {
        Ok(None)
    }
}

// Pulls raw href strings out of a document body, in document order
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, body: &str) -> Vec<String>;
}
