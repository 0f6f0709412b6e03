// src/crawl/engine.rs
// =============================================================================
// The crawl engine: drives a Frontier from the seed to a CrawlResult.
//
// How it works:
// 1. Normalize the seed; it is both the first queued URL and the site origin
// 2. Each round takes *everything* currently queued and visits it
//    concurrently (fetch, classify, extract links, admit new ones)
// 3. The round ends only when every visit has finished (the barrier), then
//    depth goes up by one
// 4. Stop when the queue is empty, depth hits max_depth, or the caller
//    cancels between rounds
//
// Because the barrier separates rounds, round N holds exactly the pages that
// are N links away from the seed: the traversal is breadth-first without an
// explicit per-item depth.
//
// A failed URL never stops the crawl. The only errors returned are
// ConfigError, before anything is fetched.
// =============================================================================

use super::config::CrawlConfig;
use super::frontier::{CrawlResult, Frontier, StopReason};
use super::links;
use super::progress::CrawlObserver;
use crate::error::ConfigError;
use crate::normalize::{normalize, CanonicalUrl};
use crate::page::{
    Failure, Fetcher, HtmlLinkExtractor, HttpFetcher, HttpFetcherConfig, LinkExtractor, Verdict,
};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct Crawler<F, E> {
    fetcher: F,
    extractor: E,
    config: CrawlConfig,
    observer: Option<Arc<dyn CrawlObserver>>,
}

impl<F: Fetcher, E: LinkExtractor> Crawler<F, E> {
    pub fn new(fetcher: F, extractor: E, config: CrawlConfig) -> Self {
        Self {
            fetcher,
            extractor,
            config,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub async fn crawl(&self, seed: &str) -> Result<CrawlResult, ConfigError> {
        self.crawl_with_cancellation(seed, CancellationToken::new()).await
    }

    // Same as crawl(), but stops at the next round boundary once `cancel`
    // fires. The partial result is still returned.
    pub async fn crawl_with_cancellation(
        &self,
        seed: &str,
        cancel: CancellationToken,
    ) -> Result<CrawlResult, ConfigError> {
        self.config.validate()?;

        if seed.trim().is_empty() {
            return Err(ConfigError::EmptySeed);
        }
        let origin = normalize(seed).map_err(|source| ConfigError::InvalidSeed {
            seed: seed.to_string(),
            source,
        })?;

        info!(origin = %origin, max_depth = self.config.max_depth, "Crawling");

        let frontier = Mutex::new(Frontier::seeded(origin.clone()));

        let stop_reason = loop {
            let work = {
                let mut state = frontier.lock().await;
                if !state.has_pending() {
                    break StopReason::Exhausted;
                }
                if state.depth() >= self.config.max_depth {
                    break StopReason::DepthLimit;
                }
                if cancel.is_cancelled() {
                    break StopReason::Cancelled;
                }
                state.start_round()
            };

            debug!(urls = work.len(), "Starting round");

            // Fan out, then wait for every visit (the round barrier)
            join_all(work.iter().map(|url| self.visit(url, &origin, &frontier))).await;

            let progress = {
                let mut state = frontier.lock().await;
                state.finish_round();
                state.progress()
            };
            if let Some(observer) = &self.observer {
                observer.on_round_complete(&progress);
            }
        };

        let result = frontier.into_inner().into_result(stop_reason);
        info!(
            found = result.found.len(),
            errors = result.errors.len(),
            depth = result.depth_reached,
            reason = ?result.stop_reason,
            "Crawl finished"
        );

        Ok(result)
    }

    // Fetches, classifies and expands one URL
    //
    // The frontier lock is taken once, after the network work is done, and
    // covers recording this URL and admitting all of its links.
    async fn visit(&self, url: &CanonicalUrl, origin: &CanonicalUrl, frontier: &Mutex<Frontier>) {
        let (verdict, body) = self.classify(url).await;

        if let Some(observer) = &self.observer {
            observer.on_page(url, &verdict);
        }

        match verdict {
            Verdict::Html => {
                let hrefs = self.extractor.extract_links(&body);
                let discovered = links::discover(hrefs, url, origin, self.config.link_policy);

                let mut state = frontier.lock().await;
                state.record_found(url.clone());

                let mut admitted = 0;
                for link in discovered.internal {
                    if state.admit(link) {
                        admitted += 1;
                    }
                }
                for link in discovered.external {
                    state.record_external(link);
                }

                debug!(url = %url, admitted, "Found page");
            }
            Verdict::NotHtml(content_type) => {
                debug!(url = %url, content_type = ?content_type, "Skipping non-HTML response");
                frontier.lock().await.record_skipped(url.clone());
            }
            Verdict::Failed(failure) => {
                warn!(url = %url, error = %failure, "Failed to load");
                frontier.lock().await.record_error(url.clone());
            }
        }
    }

    // Returns the verdict and, for HTML pages, the body
    //
    // With use_head, a HEAD that already says "error" or "not HTML" settles
    // the URL without a GET. 405/501 mean the server doesn't do HEAD, so we
    // GET instead.
    async fn classify(&self, url: &CanonicalUrl) -> (Verdict, String) {
        if self.config.use_head {
            match self.fetcher.head(url.as_str()).await {
                Ok(Some(head)) => match head.verdict() {
                    Verdict::Html | Verdict::Failed(Failure::Status(405 | 501)) => {}
                    verdict => return (verdict, String::new()),
                },
                Ok(None) => {}
                Err(e) => return (Verdict::Failed(e.into()), String::new()),
            }
        }

        match self.fetcher.fetch(url.as_str()).await {
            Ok(page) => (page.head.verdict(), page.body),
            Err(e) => (Verdict::Failed(e.into()), String::new()),
        }
    }
}

// Crawls a website over HTTP
//
// This is the entry point the CLI uses: reqwest for fetching, scraper for
// link extraction.
pub async fn crawl_website(
    seed: &str,
    config: CrawlConfig,
    http: &HttpFetcherConfig,
    cancel: CancellationToken,
    observer: Option<Arc<dyn CrawlObserver>>,
) -> anyhow::Result<CrawlResult> {
    let mut crawler = Crawler::new(HttpFetcher::new(http)?, HtmlLinkExtractor::new(), config);
    if let Some(observer) = observer {
        crawler = crawler.with_observer(observer);
    }

    Ok(crawler.crawl_with_cancellation(seed, cancel).await?)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why join_all and not tokio::spawn?
//    - Every visit borrows the crawler and the frontier
//    - join_all polls all of them concurrently on the current task, so no
//      'static bounds or Arc clones are needed
//    - The requests still overlap: each visit is parked on its own socket
//
// 2. Why tokio::sync::Mutex?
//    - Several visits finish in the same round and all want to admit links
//    - Admission is check-then-insert; two pages finding the same new link
//      must not both queue it
//    - The lock is only held for set operations, never across a fetch
//
// 3. Why a loop instead of recursion?
//    - Depth is the loop counter; the stack doesn't grow with max_depth
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::config::LinkPolicy;
    use crate::crawl::frontier::CrawlProgress;
    use crate::crawl::test_site::{Route, TestSite};
    use std::sync::Mutex as StdMutex;

    fn url(raw: &str) -> CanonicalUrl {
        normalize(raw).unwrap()
    }

    fn urls(raw: &[&str]) -> Vec<CanonicalUrl> {
        raw.iter().map(|r| url(r)).collect()
    }

    fn crawler(site: TestSite, max_depth: usize) -> Crawler<TestSite, HtmlLinkExtractor> {
        Crawler::new(site, HtmlLinkExtractor::new(), CrawlConfig::with_max_depth(max_depth))
    }

    // The fixture website: four pages, a logo, and a few broken links
    fn fixture_site() -> TestSite {
        TestSite::new()
            .route(
                "http://localhost:3000",
                Route::html(
                    r##"<a href="/child-a">A</a>
                        <a href="child-b#frag">B</a>
                        <a href="http://localhost:3000/child-b">B again</a>
                        <a href="/child-does-not-exist">Missing</a>
                        <a href="#top">Top</a>
                        <a href="mailto:a@b.com">Mail</a>
                        <a href="tel:123">Call</a>
                        <a href="https://example.org/elsewhere">Elsewhere</a>"##,
                ),
            )
            .route(
                "http://localhost:3000/child-a",
                Route::html(r#"<a href="child-b">Nested</a><a href="/child-c?ref=a">C</a>"#),
            )
            .route(
                "http://localhost:3000/child-b",
                Route::html(
                    r#"<a href="img.png">Broken image</a>
                       <a href="/logo.png">Logo</a>
                       <a href="/child-a">A</a>"#,
                ),
            )
            .route("http://localhost:3000/child-c", Route::html(r#"<a href="/">Home</a>"#))
            .route("http://localhost:3000/logo.png", Route::asset("image/png"))
    }

    #[tokio::test]
    async fn test_full_site_crawl() {
        let crawler = crawler(fixture_site(), 100);
        let result = crawler.crawl("localhost:3000").await.unwrap();

        assert_eq!(
            result.found,
            urls(&[
                "http://localhost:3000",
                "http://localhost:3000/child-a",
                "http://localhost:3000/child-b",
                "http://localhost:3000/child-c",
            ])
        );
        assert_eq!(
            result.errors,
            urls(&[
                "http://localhost:3000/child-a/child-b",
                "http://localhost:3000/child-b/img.png",
                "http://localhost:3000/child-does-not-exist",
            ])
        );
        assert_eq!(result.external, urls(&["https://example.org/elsewhere"]));
        assert_eq!(result.stop_reason, StopReason::Exhausted);
        assert!(result.depth_reached < 100);

        // Every URL fetched exactly once, the external one never
        let site = &crawler.fetcher;
        assert!(site.gets().iter().all(|u| site.get_count(u) == 1));
        assert_eq!(site.get_count("https://example.org/elsewhere"), 0);
        assert_eq!(site.gets().len(), 8);
    }

    #[tokio::test]
    async fn test_classification() {
        let site = TestSite::new()
            .route(
                "http://site.test",
                Route::html(r#"<a href="/page">p</a><a href="/gone">g</a><a href="/photo.jpg">i</a>"#),
            )
            .route("http://site.test/page", Route::html("<p>hello</p>"))
            .route("http://site.test/photo.jpg", Route::asset("image/jpeg"));

        let result = crawler(site, 2).crawl("http://site.test").await.unwrap();

        assert_eq!(result.found, urls(&["http://site.test", "http://site.test/page"]));
        assert_eq!(result.errors, urls(&["http://site.test/gone"]));
    }

    #[tokio::test]
    async fn test_depth_one_only_classifies_the_seed() {
        let crawler = crawler(fixture_site(), 1);
        let result = crawler.crawl("http://localhost:3000/").await.unwrap();

        assert_eq!(result.found, urls(&["http://localhost:3000"]));
        assert!(result.errors.is_empty());
        assert_eq!(result.stop_reason, StopReason::DepthLimit);
        assert_eq!(result.depth_reached, 1);
        assert_eq!(crawler.fetcher.gets(), vec!["http://localhost:3000".to_string()]);
    }

    #[tokio::test]
    async fn test_shared_link_is_fetched_once() {
        // a and b both link to c in the same round
        let site = TestSite::new()
            .route("http://s.test", Route::html(r#"<a href="/a">a</a><a href="/b">b</a>"#))
            .route("http://s.test/a", Route::html(r#"<a href="/c">c</a><a href="/">home</a>"#))
            .route("http://s.test/b", Route::html(r#"<a href="/c/">c</a><a href="/a">a</a>"#))
            .route("http://s.test/c", Route::html(r#"<a href="/a">a</a>"#));

        let crawler = crawler(site, 10);
        let result = crawler.crawl("http://s.test").await.unwrap();

        assert_eq!(
            result.found,
            urls(&["http://s.test", "http://s.test/a", "http://s.test/b", "http://s.test/c"])
        );
        assert_eq!(crawler.fetcher.get_count("http://s.test/c"), 1);
        assert_eq!(crawler.fetcher.gets().len(), 4);
        assert_eq!(result.depth_reached, 3);
    }

    #[tokio::test]
    async fn test_densely_linked_site_visits_each_url_once() {
        // Every page links to every other page, a broken page and an image,
        // with different spellings, so each round rediscovers everything
        let nav = r#"<a href="/p1">1</a><a href="/p2/">2</a><a href="/p3#x">3</a>
                     <a href="http://dense.test/p4?ref=nav">4</a><a href="/">home</a>
                     <a href="/broken">b</a><a href="/pic.gif">i</a>"#;
        let mut site = TestSite::new().route("http://dense.test/pic.gif", Route::asset("image/gif"));
        for page in [
            "http://dense.test",
            "http://dense.test/p1",
            "http://dense.test/p2",
            "http://dense.test/p3",
            "http://dense.test/p4",
        ] {
            site = site.route(page, Route::html(nav));
        }

        // finish_round asserts the frontier sets stay disjoint after every round
        let crawler = crawler(site, 10);
        let result = crawler.crawl("http://dense.test").await.unwrap();

        assert_eq!(result.found.len(), 5);
        assert_eq!(result.errors, urls(&["http://dense.test/broken"]));
        assert!(result.found.iter().all(|u| !result.errors.contains(u)));
        assert_eq!(crawler.fetcher.gets().len(), 7);
        assert!(crawler.fetcher.gets().iter().all(|u| crawler.fetcher.get_count(u) == 1));
        assert_eq!(result.stop_reason, StopReason::Exhausted);
        assert_eq!(result.depth_reached, 2);
    }

    #[tokio::test]
    async fn test_every_fetch_failing_still_returns_a_result() {
        let site = TestSite::new().route("http://down.test", Route::Unreachable);
        let result = crawler(site, 5).crawl("http://down.test").await.unwrap();

        assert!(result.found.is_empty());
        assert_eq!(result.errors, urls(&["http://down.test"]));
        assert_eq!(result.stop_reason, StopReason::Exhausted);
    }

    #[tokio::test]
    async fn test_config_errors_abort_before_fetching() {
        let crawler = crawler(fixture_site(), 3);
        assert!(matches!(crawler.crawl("  ").await, Err(ConfigError::EmptySeed)));
        assert!(matches!(
            crawler.crawl("ftp://localhost").await,
            Err(ConfigError::InvalidSeed { .. })
        ));

        let zero = self::crawler(fixture_site(), 0);
        assert!(matches!(zero.crawl("localhost:3000").await, Err(ConfigError::ZeroDepth)));

        assert!(crawler.fetcher.gets().is_empty());
        assert!(zero.fetcher.gets().is_empty());
    }

    #[tokio::test]
    async fn test_relative_only_policy_skips_absolute_links() {
        let mut config = CrawlConfig::with_max_depth(100);
        config.link_policy = LinkPolicy::RelativeOnly;
        let crawler = Crawler::new(fixture_site(), HtmlLinkExtractor::new(), config);

        let result = crawler.crawl("localhost:3000").await.unwrap();

        assert!(result.external.is_empty());
        // child-b is still reachable through its relative spelling
        assert!(result.found.contains(&url("http://localhost:3000/child-b")));
    }

    #[tokio::test]
    async fn test_head_short_circuits_errors_and_assets() {
        let site = fixture_site().with_head();
        let mut config = CrawlConfig::with_max_depth(100);
        config.use_head = true;
        let crawler = Crawler::new(site, HtmlLinkExtractor::new(), config);

        let result = crawler.crawl("localhost:3000").await.unwrap();
        let site = &crawler.fetcher;

        assert_eq!(result.found.len(), 4);
        assert_eq!(result.errors.len(), 3);
        assert_eq!(site.get_count("http://localhost:3000/logo.png"), 0);
        assert_eq!(site.get_count("http://localhost:3000/child-does-not-exist"), 0);
        assert_eq!(site.head_count("http://localhost:3000/logo.png"), 1);
        assert_eq!(site.get_count("http://localhost:3000/child-a"), 1);
    }

    #[tokio::test]
    async fn test_head_not_allowed_falls_back_to_get() {
        let site = TestSite::new()
            .route("http://nohead.test", Route::html("<p>ok</p>"))
            .with_head()
            .head_status(405);
        let mut config = CrawlConfig::with_max_depth(3);
        config.use_head = true;
        let crawler = Crawler::new(site, HtmlLinkExtractor::new(), config);

        let result = crawler.crawl("http://nohead.test").await.unwrap();

        assert_eq!(result.found, urls(&["http://nohead.test"]));
        assert_eq!(crawler.fetcher.get_count("http://nohead.test"), 1);
    }

    // Cancels the crawl from inside the first round
    struct CancelAfterFirstRound {
        token: CancellationToken,
        rounds: StdMutex<Vec<CrawlProgress>>,
    }

    impl CrawlObserver for CancelAfterFirstRound {
        fn on_round_complete(&self, progress: &CrawlProgress) {
            self.rounds.lock().unwrap().push(*progress);
            self.token.cancel();
        }
    }

    #[tokio::test]
    async fn test_cancellation_between_rounds() {
        let token = CancellationToken::new();
        let observer = Arc::new(CancelAfterFirstRound {
            token: token.clone(),
            rounds: StdMutex::new(Vec::new()),
        });
        let crawler = crawler(fixture_site(), 100).with_observer(observer.clone());

        let result = crawler.crawl_with_cancellation("localhost:3000", token).await.unwrap();

        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.found, urls(&["http://localhost:3000"]));
        assert_eq!(
            *observer.rounds.lock().unwrap(),
            vec![CrawlProgress { depth: 1, queued: 3, found: 1, errors: 0 }]
        );
    }
}
