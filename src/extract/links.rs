use crate::scope::UrlScope;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Collects normalized same-domain links from a page.
///
/// The whole document is scanned, navigation chrome included: boilerplate
/// removal only applies to content extraction, and section navigation is
/// often the richest source of in-domain links. Order is unspecified (set
/// semantics); the traversal decides processing order.
pub fn extract_links(html: &str, page_url: &Url, scope: &UrlScope) -> HashSet<String> {
    let doc = Html::parse_document(html);
    let anchor = Selector::parse("a[href]").expect("static selector");

    let mut links = HashSet::new();
    for element in doc.select(&anchor) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(normalized) = UrlScope::normalize(page_url, href) else {
            continue;
        };
        if scope.is_same_domain(&normalized) {
            links.insert(normalized);
        }
    }

    ::log::debug!("Found {} same-domain links in {}", links.len(), page_url);

    links
}
