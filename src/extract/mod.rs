pub mod blocks;
pub mod inline;
pub mod links;
pub mod locate;

#[cfg(test)]
mod tests;

use blocks::BlockRenderer;
use locate::ContentLocator;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Elements excised from a page before content extraction. They never
/// contribute to the Markdown output.
const REMOVED_ELEMENTS: &str = "script, style, nav, footer, header, aside";

/// Options controlling Markdown rendering
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Language tag for fenced code blocks that carry no language class
    pub fallback_language: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            fallback_language: "php".to_string(),
        }
    }
}

/// Result of extracting one page
pub struct ExtractResult {
    /// Page title, if the document had a `<title>` tag
    pub title: Option<String>,

    /// The rendered Markdown document, header section included
    pub markdown: String,
}

/// Converts fetched HTML pages into Markdown documents.
///
/// Construct once per crawl run; the heuristics it compiles are shared
/// across every page.
pub struct PageExtractor {
    locator: ContentLocator,
    renderer: BlockRenderer,
    excess_blank_lines: Regex,
}

impl PageExtractor {
    pub fn new(options: &ExtractOptions) -> Self {
        Self {
            locator: ContentLocator::new(),
            renderer: BlockRenderer::new(options),
            excess_blank_lines: Regex::new(r"\n{4,}").expect("static pattern"),
        }
    }

    /// Renders one fetched page into a Markdown document: a header section
    /// (title, URL annotation, optional meta description, horizontal rule)
    /// followed by the content blocks found under the content root.
    ///
    /// A page with no extractable blocks still yields the header section.
    pub fn extract(&self, html: &str, url: &str) -> ExtractResult {
        let mut doc = Html::parse_document(html);
        strip_boilerplate(&mut doc);

        let base = Url::parse(url).ok();
        let title = first_text(&doc, "title");
        let description = meta_description(&doc);

        let mut parts: Vec<String> = Vec::new();
        parts.push(format!("# {}\n", title.as_deref().unwrap_or("")));
        parts.push(format!("\n**URL:** {url}\n"));
        if let Some(description) = description.as_deref().filter(|d| !d.is_empty()) {
            parts.push(format!("\n**Description:** {description}\n"));
        }
        parts.push("\n---\n".to_string());

        let root = self.locator.locate(&doc);
        self.renderer.render(root, base.as_ref(), &mut parts);

        let markdown = self
            .excess_blank_lines
            .replace_all(&parts.concat(), "\n\n\n")
            .into_owned();

        ExtractResult { title, markdown }
    }
}

/// Detaches script, style and navigation chrome from the parsed tree.
fn strip_boilerplate(doc: &mut Html) {
    let selector = Selector::parse(REMOVED_ELEMENTS).expect("static selector");
    let unwanted: Vec<_> = doc.select(&selector).map(|element| element.id()).collect();
    for id in unwanted {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Stripped text of the first element matching `selector`, if any.
fn first_text(doc: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).expect("static selector");
    doc.select(&selector)
        .next()
        .map(|element| element.text().map(str::trim).collect())
}

fn meta_description(doc: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[name="description"]"#).expect("static selector");
    doc.select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(str::to_string)
}

/// Collapses all runs of whitespace to single spaces and trims the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves an href or src against the page URL, falling back to the raw
/// attribute value when resolution is impossible.
pub(crate) fn resolve_href(base: Option<&Url>, href: &str) -> String {
    match base.and_then(|b| b.join(href).ok()) {
        Some(resolved) => resolved.to_string(),
        None => href.to_string(),
    }
}
