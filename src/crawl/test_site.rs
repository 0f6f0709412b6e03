// src/crawl/test_site.rs
// =============================================================================
// An in-memory website for crawler tests.
//
// Routes are keyed by canonical URL. Anything without a route answers 404,
// like a static file server would. Every request is logged so tests can
// check that no page was fetched twice.
// =============================================================================

use crate::normalize::normalize;
use crate::page::{FetchError, Fetcher, Page, ResponseHead};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum Route {
    Html(String),
    Asset(String),
    Unreachable,
}

impl Route {
    pub fn html(body: &str) -> Self {
        Route::Html(body.to_string())
    }

    pub fn asset(content_type: &str) -> Self {
        Route::Asset(content_type.to_string())
    }
}

#[derive(Default)]
pub struct TestSite {
    routes: HashMap<String, Route>,
    supports_head: bool,
    head_status: Option<u16>,
    gets: Mutex<Vec<String>>,
    heads: Mutex<Vec<String>>,
}

impl TestSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, route: Route) -> Self {
        let key = normalize(url).unwrap().to_string();
        self.routes.insert(key, route);
        self
    }

    pub fn with_head(mut self) -> Self {
        self.supports_head = true;
        self
    }

    // Forces every HEAD response to this status
    pub fn head_status(mut self, status: u16) -> Self {
        self.head_status = Some(status);
        self
    }

    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }

    pub fn get_count(&self, url: &str) -> usize {
        self.gets.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    pub fn head_count(&self, url: &str) -> usize {
        self.heads.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    fn respond(&self, url: &str) -> Result<Page, FetchError> {
        match self.routes.get(url) {
            Some(Route::Html(body)) => Ok(Page {
                head: ResponseHead::new(200, Some("text/html; charset=utf-8")),
                body: body.clone(),
            }),
            Some(Route::Asset(content_type)) => Ok(Page {
                head: ResponseHead::new(200, Some(content_type)),
                body: String::new(),
            }),
            Some(Route::Unreachable) => Err(FetchError::Connect),
            None => Ok(Page {
                head: ResponseHead::new(404, Some("text/html")),
                body: "Not Found".to_string(),
            }),
        }
    }
}

#[async_trait]
impl Fetcher for TestSite {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        self.gets.lock().unwrap().push(url.to_string());
        // Yield so visits in the same round really interleave
        tokio::task::yield_now().await;
        self.respond(url)
    }

    async fn head(&self, url: &str) -> Result<Option<ResponseHead>, FetchError> {
        if !self.supports_head {
            return Ok(None);
        }
        self.heads.lock().unwrap().push(url.to_string());
        tokio::task::yield_now().await;

        let mut head = self.respond(url)?.head;
        if let Some(status) = self.head_status {
            head.status = status;
        }
        Ok(Some(head))
    }
}
