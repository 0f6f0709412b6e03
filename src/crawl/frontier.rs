// src/crawl/frontier.rs
// =============================================================================
// The mutable state of one crawl.
//
// Every URL the crawler knows about sits in exactly one of these sets:
//
//   queue      discovered, waiting for the next round
//   in_flight  taken by the current round, not classified yet
//   found      2xx HTML page
//   errors     non-2xx status or transport failure
//   skipped    2xx but not HTML (images, PDFs, ...)
//
// A URL moves queue -> in_flight -> {found, errors, skipped} and never goes
// back. admit() is the only way into the queue and refuses anything already
// in one of the sets, so no page is fetched twice.
//
// `external` is separate: cross-origin links we saw but will never fetch.
// =============================================================================

use crate::normalize::CanonicalUrl;
use serde::Serialize;
use std::collections::HashSet;
use std::mem;

// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Nothing left in the queue
    Exhausted,
    /// Ran max_depth rounds with URLs still queued
    DepthLimit,
    /// Cancelled between two rounds
    Cancelled,
}

// The final, sorted snapshot of a crawl
//
// Serializes to exactly {"found": [...], "errors": [...]}.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub found: Vec<CanonicalUrl>,
    pub errors: Vec<CanonicalUrl>,
    #[serde(skip)]
    pub external: Vec<CanonicalUrl>,
    #[serde(skip)]
    pub depth_reached: usize,
    #[serde(skip)]
    pub stop_reason: StopReason,
}

// Counts reported to observers after each round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrawlProgress {
    pub depth: usize,
    pub queued: usize,
    pub found: usize,
    pub errors: usize,
}

#[derive(Debug, Default)]
pub struct Frontier {
    queue: HashSet<CanonicalUrl>,
    in_flight: HashSet<CanonicalUrl>,
    found: HashSet<CanonicalUrl>,
    errors: HashSet<CanonicalUrl>,
    skipped: HashSet<CanonicalUrl>,
    external: HashSet<CanonicalUrl>,
    depth: usize,
}

impl Frontier {
    // A fresh frontier with only the seed queued
    pub fn seeded(seed: CanonicalUrl) -> Self {
        let mut frontier = Self::default();
        frontier.queue.insert(seed);
        frontier
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    // Moves the whole queue into in_flight and hands it out as this round's
    // work, sorted so logs are stable from run to run
    pub fn start_round(&mut self) -> Vec<CanonicalUrl> {
        let mut work: Vec<CanonicalUrl> = mem::take(&mut self.queue).into_iter().collect();
        work.sort();
        self.in_flight.extend(work.iter().cloned());
        work
    }

    pub fn finish_round(&mut self) {
        // Every URL handed out by start_round has been classified by now
        #[cfg(test)]
        assert!(
            self.in_flight.is_empty() && self.is_disjoint(),
            "frontier sets overlap after round {}",
            self.depth
        );
        self.depth += 1;
    }

    fn is_known(&self, url: &CanonicalUrl) -> bool {
        self.queue.contains(url)
            || self.in_flight.contains(url)
            || self.found.contains(url)
            || self.errors.contains(url)
            || self.skipped.contains(url)
    }

    // Queues a URL unless it is already known. Returns true if it was added.
    pub fn admit(&mut self, url: CanonicalUrl) -> bool {
        if self.is_known(&url) {
            return false;
        }
        self.queue.insert(url)
    }

    pub fn record_found(&mut self, url: CanonicalUrl) {
        self.in_flight.remove(&url);
        self.found.insert(url);
    }

    pub fn record_error(&mut self, url: CanonicalUrl) {
        self.in_flight.remove(&url);
        self.errors.insert(url);
    }

    pub fn record_skipped(&mut self, url: CanonicalUrl) {
        self.in_flight.remove(&url);
        self.skipped.insert(url);
    }

    pub fn record_external(&mut self, url: CanonicalUrl) {
        self.external.insert(url);
    }

    pub fn progress(&self) -> CrawlProgress {
        CrawlProgress {
            depth: self.depth,
            queued: self.queue.len(),
            found: self.found.len(),
            errors: self.errors.len(),
        }
    }

    // Consumes the frontier into the sorted result
    pub fn into_result(self, stop_reason: StopReason) -> CrawlResult {
        CrawlResult {
            found: sorted(self.found),
            errors: sorted(self.errors),
            external: sorted(self.external),
            depth_reached: self.depth,
            stop_reason,
        }
    }

    #[cfg(test)]
    pub(crate) fn queued(&self) -> Vec<CanonicalUrl> {
        sorted(self.queue.clone())
    }

    // Checks that no URL is in two states at once
    #[cfg(test)]
    pub(crate) fn is_disjoint(&self) -> bool {
        let sets = [
            &self.queue,
            &self.in_flight,
            &self.found,
            &self.errors,
            &self.skipped,
        ];
        let total: usize = sets.iter().map(|s| s.len()).sum();
        let union: HashSet<&CanonicalUrl> = sets.iter().flat_map(|s| s.iter()).collect();
        total == union.len()
    }
}

fn sorted(set: HashSet<CanonicalUrl>) -> Vec<CanonicalUrl> {
    let mut list: Vec<CanonicalUrl> = set.into_iter().collect();
    list.sort();
    list
}
