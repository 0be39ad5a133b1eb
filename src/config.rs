use crate::error::CrawlError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for one crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// URL to start crawling from
    pub seed_url: String,

    /// Maximum link depth to follow from the seed (0 = single page only)
    #[serde(default)]
    pub max_depth: usize,

    /// Pause between consecutive fetches, in seconds
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Custom User-Agent; a browser-like default is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Number of concurrent fetch workers
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Language tag for fenced code blocks that carry no language class
    #[serde(default = "default_fallback_language")]
    pub fallback_language: String,

    /// Regex patterns a link must match to be crawled (empty = no restriction)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for links to skip (take precedence over includes)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

fn default_delay_secs() -> f64 {
    1.0
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrency() -> usize {
    1
}

fn default_fallback_language() -> String {
    "php".to_string()
}

impl CrawlConfig {
    /// Create a new configuration with default values
    pub fn new(seed_url: &str) -> Self {
        Self {
            seed_url: seed_url.to_string(),
            max_depth: 0,
            delay_secs: default_delay_secs(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            max_concurrency: default_max_concurrency(),
            fallback_language: default_fallback_language(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CrawlError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}
