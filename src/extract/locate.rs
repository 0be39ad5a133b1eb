use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Finds the subtree holding a page's primary readable content.
///
/// Heuristics are ordered: semantic structural tags outrank class/id
/// conventions, and the first match at the highest priority wins. The
/// ordering is part of the output contract and must not be reshuffled.
pub struct ContentLocator {
    inner_content: Regex,
    content_class: Regex,
    content_id: Regex,
    prose_class: Regex,
}

impl ContentLocator {
    pub fn new() -> Self {
        Self {
            inner_content: Regex::new(r"(?i)content").expect("static pattern"),
            content_class: Regex::new(
                r"(?i)content__default|content|main-content|documentation|docs-content",
            )
            .expect("static pattern"),
            content_id: Regex::new(r"(?i)content|main|documentation").expect("static pattern"),
            prose_class: Regex::new(r"(?i)markdown|prose|post").expect("static pattern"),
        }
    }

    /// Returns the content root. Always resolves: the search falls back to
    /// `<body>` and finally to the document root.
    pub fn locate<'a>(&self, doc: &'a Html) -> ElementRef<'a> {
        let div = Selector::parse("div").expect("static selector");

        if let Some(main) = first(doc, "main") {
            // A content-classed div inside <main> is usually tighter than
            // the <main> element itself.
            if let Some(inner) = main
                .select(&div)
                .find(|d| attr_matches(d, "class", &self.inner_content))
            {
                return inner;
            }
            return main;
        }

        if let Some(article) = first(doc, "article") {
            return article;
        }

        if let Some(found) = doc
            .select(&div)
            .find(|d| attr_matches(d, "class", &self.content_class))
        {
            return found;
        }

        if let Some(found) = doc
            .select(&div)
            .find(|d| attr_matches(d, "id", &self.content_id))
        {
            return found;
        }

        if let Some(found) = doc
            .select(&div)
            .find(|d| attr_matches(d, "class", &self.prose_class))
        {
            return found;
        }

        first(doc, "body").unwrap_or_else(|| doc.root_element())
    }
}

impl Default for ContentLocator {
    fn default() -> Self {
        Self::new()
    }
}

fn first<'a>(doc: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).expect("static selector");
    doc.select(&selector).next()
}

fn attr_matches(element: &ElementRef<'_>, attr: &str, pattern: &Regex) -> bool {
    element
        .value()
        .attr(attr)
        .is_some_and(|value| pattern.is_match(value))
}
