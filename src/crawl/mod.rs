// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Round-based breadth-first crawling from a single seed URL
// - Every URL fetched at most once (see frontier.rs)
// - Same-site restriction (external links are recorded, never fetched)
// - Configurable depth limit
// - Cancellation between rounds and a progress side channel
//
// Submodules:
// - config:   CrawlConfig and LinkPolicy
// - frontier: the queue/found/errors state and the final CrawlResult
// - links:    which hrefs on a page are worth crawling
// - engine:   the round loop itself
// - progress: observers that watch a crawl
// =============================================================================

mod config;
mod engine;
mod frontier;
mod links;
mod progress;

#[cfg(test)]
mod test_site;

pub use config::{CrawlConfig, LinkPolicy};
pub use engine::{crawl_website, Crawler};
pub use frontier::{CrawlProgress, CrawlResult, StopReason};
pub use progress::{CrawlObserver, LogObserver};
