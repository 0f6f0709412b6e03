// src/page/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which parses HTML into a real DOM tree
// (html5ever underneath), so malformed markup, attributes in odd orders and
// quotes of either kind are handled the way a browser would.
//
// Only <a href="..."> counts as a link to another page. Stylesheets,
// scripts and stray href attributes on other elements are ignored.
//
// The hrefs come back raw and in document order. Deciding which of them to
// crawl is the job of crawl::links.
// =============================================================================

use super::LinkExtractor;
use scraper::{Html, Selector};

pub struct HtmlLinkExtractor {
    anchors: Selector,
}

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self {
            // Constant selector, known to be valid
            anchors: Selector::parse("a[href]").expect("`a[href]` is a valid selector"),
        }
    }
}

impl Default for HtmlLinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, body: &str) -> Vec<String> {
        let document = Html::parse_document(body);

        document
            .select(&self.anchors)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect()
    }
}
