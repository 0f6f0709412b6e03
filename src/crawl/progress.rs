// src/crawl/progress.rs
// =============================================================================
// A side channel for watching a crawl while it runs.
//
// Observers only get told what happened; they can't change the traversal.
// The CLI uses LogObserver to print a line per round.
// =============================================================================

use super::frontier::CrawlProgress;
use crate::normalize::CanonicalUrl;
use crate::page::Verdict;
use tracing::info;

pub trait CrawlObserver: Send + Sync {
    // Called once per URL, right after it has been classified
    fn on_page(&self, _url: &CanonicalUrl, _verdict: &Verdict) {}

    // Called after every round barrier
    fn on_round_complete(&self, _progress: &CrawlProgress) {}
}

// Logs the frontier counts after each round
pub struct LogObserver;

impl CrawlObserver for LogObserver {
    fn on_round_complete(&self, progress: &CrawlProgress) {
        info!(
            depth = progress.depth,
            "Found {}, Queued {}, Errors {}",
            progress.found,
            progress.queued,
            progress.errors
        );
    }
}
