use serde::{Deserialize, Serialize};

/// Separator written between page documents in the assembled output.
pub const PAGE_SEPARATOR: &str = "\n\n---\n\n## Next Page\n\n";

/// A crawled page rendered to Markdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDocument {
    /// Normalized URL of the page
    pub url: String,

    /// Title of the page (if available)
    pub title: Option<String>,

    /// Markdown rendition of the page, header section included
    pub content: String,

    /// Same-domain links discovered on the page (as normalized strings)
    pub links: Vec<String>,
}

impl PageDocument {
    /// Create a new page document
    pub fn new(url: String, title: Option<String>, content: String, links: Vec<String>) -> Self {
        Self {
            url,
            title,
            content,
            links,
        }
    }
}

/// Joins per-page documents, in visit order, into the final text artifact.
pub fn assemble(pages: &[PageDocument]) -> String {
    pages
        .iter()
        .map(|page| page.content.as_str())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}
