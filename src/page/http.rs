// src/page/http.rs
// =============================================================================
// The network side of the crawler: a Fetcher built on reqwest.
//
// Key functionality:
// - One shared Client for the whole crawl (connection pooling)
// - HEAD support, so the crawler can skip downloading images and PDFs
// - Only reads the body of 2xx HTML responses
// - Maps reqwest errors to FetchError (timeout, DNS, SSL, redirects, ...)
//
// Redirects are followed by reqwest, so the status we report is the status
// of the final response.
// =============================================================================

use super::{FetchError, Fetcher, Page, ResponseHead};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::trace;

// Settings for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_redirects: 5,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpFetcherConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        trace!(url, "GET");
        let response = self.client.get(url).send().await.map_err(categorize_error)?;
        let head = response_head(&response);

        // Images, PDFs and error pages are never parsed, don't download them
        let body = if head.is_success() && head.is_html() {
            response.text().await.map_err(categorize_error)?
        } else {
            String::new()
        };

        Ok(Page { head, body })
    }

    async fn head(&self, url: &str) -> Result<Option<ResponseHead>, FetchError> {
        trace!(url, "HEAD");
        let response = self.client.head(url).send().await.map_err(categorize_error)?;
        Ok(Some(response_head(&response)))
    }
}

fn response_head(response: &Response) -> ResponseHead {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    ResponseHead::new(response.status().as_u16(), content_type)
}

// Categorizes the different ways a reqwest call can fail
fn categorize_error(error: reqwest::Error) -> FetchError {
    let error_string = error.to_string().to_lowercase();

    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_connect() {
        // Connection errors often mean DNS issues or host unreachable
        if error_string.contains("dns") {
            FetchError::Dns
        } else {
            FetchError::Connect
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        FetchError::Tls
    } else {
        FetchError::Request(error.to_string())
    }
}
