// src/lib.rs
// =============================================================================
// site-urls: find every page on a website.
//
// Starting from one URL, the crawler follows links round by round, staying
// on the same site, and reports which URLs loaded as HTML pages (`found`)
// and which failed (`errors`).
//
// Modules:
// - normalize: canonical URL strings, the identity used for deduplication
// - page:      fetching (reqwest) and link extraction (scraper)
// - crawl:     the frontier and the round-based crawl engine
// - output:    JSON / CSV / sitemap writers
// - error:     configuration errors that stop a crawl before it starts
// =============================================================================

pub mod crawl;
pub mod error;
pub mod normalize;
pub mod output;
pub mod page;
