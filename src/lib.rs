// Re-export modules
pub mod config;
pub mod crawlers;
pub mod error;
pub mod extract;
pub mod results;
pub mod scope;

// Re-export commonly used types for convenience
pub use config::CrawlConfig;
pub use error::{CrawlError, FetchError};
pub use results::PageDocument;

use crawlers::fetch::HttpFetcher;
use tokio::sync::mpsc;

/// Builder for configuring and running a crawl.
///
/// ```no_run
/// # async fn demo() -> Result<(), sitemark::CrawlError> {
/// let mut rx = sitemark::Scrape::new("https://example.com/docs")
///     .with_max_depth(2)
///     .with_delay(0.5)
///     .generate()
///     .await?;
/// while let Some(page) = rx.recv().await {
///     println!("{}", page.url);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Scrape {
    config: CrawlConfig,
}

impl Scrape {
    /// Create a new builder for the given seed URL.
    pub fn new(seed_url: &str) -> Self {
        Self {
            config: CrawlConfig::new(seed_url),
        }
    }

    /// Maximum link depth to follow from the seed (0 = single page only).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Pause between consecutive fetches, in seconds.
    pub fn with_delay(mut self, seconds: f64) -> Self {
        self.config.delay_secs = seconds;
        self
    }

    /// Per-request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.timeout_secs = seconds;
        self
    }

    /// Custom User-Agent string.
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.config.user_agent = Some(user_agent.to_string());
        self
    }

    /// Number of concurrent fetch workers.
    pub fn with_max_concurrency(mut self, workers: usize) -> Self {
        self.config.max_concurrency = workers;
        self
    }

    /// Language tag used for code fences with no language class.
    pub fn with_fallback_language(mut self, language: &str) -> Self {
        self.config.fallback_language = language.to_string();
        self
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: CrawlConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the configuration from a JSON file.
    pub fn with_config_file(
        mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, CrawlError> {
        self.config = CrawlConfig::from_file(path)?;
        Ok(self)
    }

    /// Start the crawl and get a receiver yielding pages as they are
    /// extracted. The only errors surfaced here are startup failures; once
    /// the crawl is running, per-page failures are logged and skipped.
    pub async fn generate(self) -> Result<mpsc::Receiver<PageDocument>, CrawlError> {
        let fetcher = HttpFetcher::new(&self.config)?;
        crawlers::web::start(self.config, fetcher).await
    }
}
