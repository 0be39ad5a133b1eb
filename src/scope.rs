use crate::error::CrawlError;
use regex::Regex;
use url::Url;

/// Scopes and canonicalizes URLs for a single crawl run.
///
/// Two URLs that differ only by trailing slash or fragment normalize to the
/// same string, so the visited set treats them as one page.
#[derive(Debug)]
pub struct UrlScope {
    base_host: String,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl UrlScope {
    /// Create a scope anchored to the seed URL's host.
    pub fn new(
        seed: &Url,
        include_patterns: &[String],
        exclude_patterns: &[String],
    ) -> Result<Self, CrawlError> {
        let base_host = seed
            .host_str()
            .ok_or_else(|| CrawlError::SeedWithoutHost(seed.to_string()))?
            .to_string();

        let mut include_regexes = Vec::with_capacity(include_patterns.len());
        for pattern in include_patterns {
            include_regexes.push(Regex::new(pattern)?);
        }

        let mut exclude_regexes = Vec::with_capacity(exclude_patterns.len());
        for pattern in exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            base_host,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Resolves `reference` against `base` and canonicalizes the result:
    /// the fragment is dropped, trailing path slashes are trimmed and the
    /// query string is kept. Returns `None` for unparsable references.
    pub fn normalize(base: &Url, reference: &str) -> Option<String> {
        let mut resolved = base.join(reference).ok()?;
        resolved.set_fragment(None);

        let mut clean = format!("{}://{}", resolved.scheme(), resolved.host_str()?);
        if let Some(port) = resolved.port() {
            clean.push(':');
            clean.push_str(&port.to_string());
        }
        clean.push_str(resolved.path());
        if let Some(query) = resolved.query() {
            clean.push('?');
            clean.push_str(query);
        }

        Some(clean.trim_end_matches('/').to_string())
    }

    /// True iff the URL's host exactly equals the crawl's base host.
    /// Unparsable URLs are never same-domain.
    pub fn is_same_domain(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => parsed.host_str() == Some(self.base_host.as_str()),
            Err(_) => false,
        }
    }

    /// Applies the configured include/exclude patterns to a normalized URL.
    /// Excludes take precedence; with no include patterns everything passes.
    pub fn allows(&self, url: &str) -> bool {
        for regex in &self.exclude_regexes {
            if regex.is_match(url) {
                return false;
            }
        }

        if !self.include_regexes.is_empty() {
            return self.include_regexes.iter().any(|regex| regex.is_match(url));
        }

        true
    }

    /// Host component every crawled URL must match.
    pub fn base_host(&self) -> &str {
        &self.base_host
    }
}
