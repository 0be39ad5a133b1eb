use crate::config::CrawlConfig;
use crate::crawlers::fetch::PageFetcher;
use crate::error::CrawlError;
use crate::extract::{ExtractOptions, PageExtractor, links};
use crate::results::PageDocument;
use crate::scope::UrlScope;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::time::Instant;
use url::Url;

/// One unit of frontier work: a normalized URL and its crawl depth.
type FrontierEntry = (String, usize);

/// Starts an async crawl and returns a receiver that yields page documents
/// as they are extracted.
///
/// # Arguments
///
/// * `config` - Crawl configuration
/// * `fetcher` - Transport used to retrieve page bodies
pub async fn start<F: PageFetcher>(
    config: CrawlConfig,
    fetcher: F,
) -> Result<mpsc::Receiver<PageDocument>, CrawlError> {
    ::log::info!("Starting crawl at: {}", config.seed_url);

    let seed = Url::parse(&config.seed_url).map_err(|source| CrawlError::InvalidSeed {
        url: config.seed_url.clone(),
        source,
    })?;
    let scope = UrlScope::new(&seed, &config.include_patterns, &config.exclude_patterns)?;
    let seed_entry = UrlScope::normalize(&seed, seed.as_str())
        .ok_or_else(|| CrawlError::SeedWithoutHost(config.seed_url.clone()))?;

    let (crawl_tx, crawl_rx) = mpsc::channel::<FrontierEntry>(10_000);
    let (result_tx, result_rx) = mpsc::channel::<PageDocument>(10_000);

    let options = ExtractOptions {
        fallback_language: config.fallback_language.clone(),
    };
    let workers = config.max_concurrency.max(1);
    let state = Arc::new(CrawlState {
        limiter: RateLimiter::new(Duration::from_secs_f64(config.delay_secs.max(0.0))),
        max_depth: config.max_depth,
        scope,
        fetcher,
        extractor: PageExtractor::new(&options),
        visited: Mutex::new(HashSet::new()),
        frontier: Mutex::new(Frontier {
            tx: Some(crawl_tx),
            pending: 0,
        }),
    });

    // Queue the seed; workers drain the channel until the frontier closes.
    enqueue(&state, seed_entry, 0).await;

    let crawl_rx = Arc::new(Mutex::new(crawl_rx));
    for worker_id in 0..workers {
        spawn_worker(worker_id, Arc::clone(&state), Arc::clone(&crawl_rx), result_tx.clone());
    }

    // The original result sender drops here; the channel closes once every
    // worker has exited.
    Ok(result_rx)
}

/// Shared state for one crawl run.
struct CrawlState<F> {
    scope: UrlScope,
    fetcher: F,
    extractor: PageExtractor,
    max_depth: usize,
    limiter: RateLimiter,
    visited: Mutex<HashSet<String>>,
    frontier: Mutex<Frontier>,
}

/// Frontier bookkeeping shared by all workers.
///
/// `pending` counts entries queued or in flight. Once it reaches zero no
/// new work can appear, so the sender is dropped; the drained channel then
/// returns `None` to every worker and the run winds down.
struct Frontier {
    tx: Option<mpsc::Sender<FrontierEntry>>,
    pending: usize,
}

/// Spaces out fetches: every fetch after the first waits until `delay` has
/// passed since the previous fetch started. The first fetch is not delayed.
struct RateLimiter {
    delay: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            last: Mutex::new(None),
        }
    }

    async fn acquire(&self) {
        if self.delay.is_zero() {
            return;
        }

        // Holding the lock through the sleep spaces waiters one delay apart.
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.delay;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Queues an entry, accounting for it in the pending counter first so the
/// frontier cannot close while the entry is in flight.
async fn enqueue<F: PageFetcher>(state: &Arc<CrawlState<F>>, url: String, depth: usize) {
    let tx = {
        let mut frontier = state.frontier.lock().await;
        let Some(tx) = frontier.tx.clone() else {
            return;
        };
        frontier.pending += 1;
        tx
    };

    if tx.send((url, depth)).await.is_err() {
        // Unreachable while any worker holds the receiver, but keep the
        // counter honest if it ever happens.
        let mut frontier = state.frontier.lock().await;
        frontier.pending -= 1;
        if frontier.pending == 0 {
            frontier.tx = None;
        }
    }
}

/// Marks one frontier entry fully processed; closes the frontier when no
/// queued or in-flight work remains.
async fn complete<F: PageFetcher>(state: &Arc<CrawlState<F>>) {
    let mut frontier = state.frontier.lock().await;
    frontier.pending -= 1;
    if frontier.pending == 0 {
        ::log::debug!("Frontier exhausted, closing crawl channel");
        frontier.tx = None;
    }
}

/// Spawns a single worker that processes frontier entries until the
/// channel closes.
fn spawn_worker<F: PageFetcher>(
    worker_id: usize,
    state: Arc<CrawlState<F>>,
    crawl_rx: Arc<Mutex<mpsc::Receiver<FrontierEntry>>>,
    result_tx: mpsc::Sender<PageDocument>,
) {
    ::log::trace!("Spawning worker {}", worker_id);

    tokio::spawn(async move {
        while let Some((url, depth)) = next_entry(&crawl_rx).await {
            process_entry(worker_id, &state, &result_tx, url, depth).await;
            complete(&state).await;
        }
        ::log::debug!("Worker {} finished - no more URLs to process", worker_id);
    });
}

async fn next_entry(
    crawl_rx: &Arc<Mutex<mpsc::Receiver<FrontierEntry>>>,
) -> Option<FrontierEntry> {
    let mut rx = crawl_rx.lock().await;
    rx.recv().await
}

/// Drives one frontier entry through fetch and extraction.
async fn process_entry<F: PageFetcher>(
    worker_id: usize,
    state: &Arc<CrawlState<F>>,
    result_tx: &mpsc::Sender<PageDocument>,
    url: String,
    depth: usize,
) {
    if depth > state.max_depth {
        ::log::trace!("Worker {} dropping {} beyond depth bound", worker_id, url);
        return;
    }

    // The URL enters the visited set before the fetch is issued; a second
    // entry for the same URL is dropped here no matter which page queued it.
    if !mark_visited(worker_id, &url, state).await {
        return;
    }

    state.limiter.acquire().await;

    ::log::info!("Fetching: {}", url);
    let html = match state.fetcher.fetch(&url).await {
        Ok(html) => html,
        Err(error) => {
            ::log::warn!("Worker {} failed to fetch {}: {}", worker_id, url, error);
            return;
        }
    };

    let (document, children) = extract_page(state, &url, &html, depth);
    ::log::debug!("Worker {} extracted: {}", worker_id, url);

    if result_tx.send(document).await.is_err() {
        ::log::error!("Worker {} failed to send result for {}", worker_id, url);
        return;
    }

    for child in children {
        let unseen = {
            let seen = state.visited.lock().await;
            !seen.contains(&child)
        };
        if unseen {
            ::log::debug!("Queuing link for crawling: {}", child);
            enqueue(state, child, depth + 1).await;
        } else {
            ::log::trace!("Skipping already visited link: {}", child);
        }
    }
}

/// Checks and records a URL in the visited set under one lock acquisition.
async fn mark_visited<F: PageFetcher>(
    worker_id: usize,
    url: &str,
    state: &Arc<CrawlState<F>>,
) -> bool {
    let mut seen = state.visited.lock().await;
    if seen.contains(url) {
        ::log::trace!("Worker {} skipping already visited: {}", worker_id, url);
        return false;
    }
    seen.insert(url.to_string());
    true
}

/// Synchronous extraction step: the parsed document must never live across
/// an await point, so everything DOM-shaped happens in here.
fn extract_page<F: PageFetcher>(
    state: &Arc<CrawlState<F>>,
    url: &str,
    html: &str,
    depth: usize,
) -> (PageDocument, Vec<String>) {
    let discovered = match Url::parse(url) {
        Ok(base) => links::extract_links(html, &base, &state.scope),
        Err(_) => HashSet::new(),
    };
    let discovered: Vec<String> = discovered.into_iter().collect();

    let children = if depth < state.max_depth {
        discovered
            .iter()
            .filter(|link| state.scope.allows(link))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    let extracted = state.extractor.extract(html, url);
    let document = PageDocument::new(
        url.to_string(),
        extracted.title,
        extracted.markdown,
        discovered,
    );

    (document, children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::collections::HashMap;

    /// In-memory fetcher: a map of normalized URL to HTML body, recording
    /// every fetch it serves.
    struct FakeFetcher {
        pages: HashMap<String, String>,
        hits: Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl FakeFetcher {
        fn new(pages: &[(&str, &str)]) -> (Self, Arc<std::sync::Mutex<Vec<String>>>) {
            let hits = Arc::new(std::sync::Mutex::new(Vec::new()));
            let fetcher = Self {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
                hits: Arc::clone(&hits),
            };
            (fetcher, hits)
        }
    }

    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.hits.lock().unwrap().push(url.to_string());
            match self.pages.get(url) {
                Some(body) => Ok(body.clone()),
                None => Err(FetchError::Status(404)),
            }
        }
    }

    fn config(seed: &str, max_depth: usize) -> CrawlConfig {
        let mut config = CrawlConfig::new(seed);
        config.max_depth = max_depth;
        config.delay_secs = 0.0;
        config
    }

    async fn run(config: CrawlConfig, fetcher: FakeFetcher) -> Vec<PageDocument> {
        let mut rx = start(config, fetcher).await.unwrap();
        let mut pages = Vec::new();
        while let Some(page) = rx.recv().await {
            pages.push(page);
        }
        pages
    }

    #[tokio::test]
    async fn test_single_page_no_links() {
        let (fetcher, hits) = FakeFetcher::new(&[(
            "https://example.com/docs",
            "<html><head><title>Title</title></head>\
             <body><h1>Title</h1><p>Hello <b>world</b></p></body></html>",
        )]);

        let pages = run(config("https://example.com/docs", 0), fetcher).await;

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].url, "https://example.com/docs");
        assert!(pages[0].content.contains("# Title"));
        assert!(pages[0].content.contains("\nHello **world**\n"));
        assert_eq!(hits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_visited_once_under_cross_links() {
        // a, b and c all link to each other; each must be fetched exactly once.
        let (fetcher, hits) = FakeFetcher::new(&[
            (
                "https://example.com/a",
                r#"<body><a href="/b">b</a><a href="/c">c</a></body>"#,
            ),
            (
                "https://example.com/b",
                r#"<body><a href="/a">a</a><a href="/c">c</a></body>"#,
            ),
            (
                "https://example.com/c",
                r#"<body><a href="/a">a</a><a href="/b">b</a></body>"#,
            ),
        ]);

        let pages = run(config("https://example.com/a", 5), fetcher).await;

        assert_eq!(pages.len(), 3);
        let mut fetched = hits.lock().unwrap().clone();
        fetched.sort();
        assert_eq!(
            fetched,
            vec![
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c",
            ]
        );
    }

    #[tokio::test]
    async fn test_depth_bound() {
        let (fetcher, hits) = FakeFetcher::new(&[
            ("https://example.com/a", r#"<body><a href="/b">b</a></body>"#),
            ("https://example.com/b", r#"<body><a href="/c">c</a></body>"#),
            ("https://example.com/c", "<body><p>deep</p></body>"),
        ]);

        let pages = run(config("https://example.com/a", 1), fetcher).await;

        assert_eq!(pages.len(), 2);
        let fetched = hits.lock().unwrap().clone();
        assert!(!fetched.contains(&"https://example.com/c".to_string()));
    }

    #[tokio::test]
    async fn test_depth_zero_never_recurses() {
        let (fetcher, hits) = FakeFetcher::new(&[(
            "https://example.com/a",
            r#"<body><a href="/b">b</a><a href="/c">c</a></body>"#,
        )]);

        let pages = run(config("https://example.com/a", 0), fetcher).await;

        assert_eq!(pages.len(), 1);
        assert_eq!(hits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_page_and_continues() {
        // b is missing (404); a and c must still come through.
        let (fetcher, _hits) = FakeFetcher::new(&[
            (
                "https://example.com/a",
                r#"<body><a href="/b">b</a><a href="/c">c</a></body>"#,
            ),
            ("https://example.com/c", "<body><p>fine</p></body>"),
        ]);

        let mut urls: Vec<String> = run(config("https://example.com/a", 2), fetcher)
            .await
            .into_iter()
            .map(|page| page.url)
            .collect();
        urls.sort();

        assert_eq!(urls, vec!["https://example.com/a", "https://example.com/c"]);
    }

    #[tokio::test]
    async fn test_cross_domain_links_are_not_followed() {
        let (fetcher, hits) = FakeFetcher::new(&[(
            "https://example.com/a",
            r#"<body><a href="https://other.com/x">x</a>
               <a href="https://docs.example.com/y">y</a></body>"#,
        )]);

        let pages = run(config("https://example.com/a", 3), fetcher).await;

        assert_eq!(pages.len(), 1);
        assert_eq!(hits.lock().unwrap().len(), 1);
        assert!(pages[0].links.is_empty());
    }

    #[tokio::test]
    async fn test_trailing_slash_and_fragment_variants_collapse() {
        // Three spellings of /b must produce a single fetch.
        let (fetcher, hits) = FakeFetcher::new(&[
            (
                "https://example.com/a",
                r#"<body><a href="/b">1</a><a href="/b/">2</a><a href="/b#x">3</a></body>"#,
            ),
            ("https://example.com/b", "<body><p>b</p></body>"),
        ]);

        let pages = run(config("https://example.com/a", 1), fetcher).await;

        assert_eq!(pages.len(), 2);
        assert_eq!(hits.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_exclude_patterns_prune_links() {
        let mut config = config("https://example.com/a", 2);
        config.exclude_patterns = vec![r"/private/".to_string()];
        let (fetcher, hits) = FakeFetcher::new(&[
            (
                "https://example.com/a",
                r#"<body><a href="/private/b">b</a><a href="/c">c</a></body>"#,
            ),
            ("https://example.com/c", "<body><p>c</p></body>"),
        ]);

        let pages = run(config, fetcher).await;

        assert_eq!(pages.len(), 2);
        let fetched = hits.lock().unwrap().clone();
        assert!(!fetched.contains(&"https://example.com/private/b".to_string()));
    }

    #[tokio::test]
    async fn test_concurrent_workers_terminate() {
        let mut config = config("https://example.com/a", 2);
        config.max_concurrency = 4;
        let (fetcher, hits) = FakeFetcher::new(&[
            (
                "https://example.com/a",
                r#"<body><a href="/b">b</a><a href="/c">c</a><a href="/d">d</a></body>"#,
            ),
            ("https://example.com/b", r#"<body><a href="/c">c</a></body>"#),
            ("https://example.com/c", r#"<body><a href="/d">d</a></body>"#),
            ("https://example.com/d", "<body><p>d</p></body>"),
        ]);

        let pages = run(config, fetcher).await;

        assert_eq!(pages.len(), 4);
        assert_eq!(hits.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_invalid_seed_is_fatal() {
        let result = start(config("not a url", 0), FakeFetcher::new(&[]).0).await;
        assert!(matches!(result, Err(CrawlError::InvalidSeed { .. })));
    }
}
