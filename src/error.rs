use thiserror::Error;

/// Errors that stop a crawl before any page is fetched.
///
/// Everything that can go wrong after startup is per-page and is logged
/// and swallowed by the traversal instead of being surfaced here.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The seed URL could not be parsed.
    #[error("invalid seed URL {url:?}: {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The seed URL parsed but has no host to scope the crawl to.
    #[error("seed URL {0:?} has no host")]
    SeedWithoutHost(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// A configured include/exclude pattern failed to compile.
    #[error("invalid URL filter pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Config(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("failed to parse config file: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

/// A single failed page fetch. The page is skipped and the run continues.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection, DNS or protocol failure.
    #[error("network error: {0}")]
    Network(String),
}
