use super::inline::{element_text, render_inline};
use super::{ExtractOptions, collapse_whitespace, resolve_href};
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

/// Block-level tags considered by the renderer, in one selector.
const BLOCK_TAGS: &str = "h1, h2, h3, h4, h5, h6, p, pre, ul, ol, table, blockquote, img, svg";

/// Renders the structural elements under a content root into Markdown
/// fragments, one per matched block, in document order.
pub struct BlockRenderer {
    fallback_language: String,
    heading_prefix: Regex,
}

impl BlockRenderer {
    pub fn new(options: &ExtractOptions) -> Self {
        Self {
            fallback_language: options.fallback_language.clone(),
            heading_prefix: Regex::new(r"^#+\s*").expect("static pattern"),
        }
    }

    /// Walks `root`'s descendants and appends one fragment per recognized
    /// block element. Nodes nested inside `pre` or `code` are skipped;
    /// their content is already captured by the enclosing code block.
    pub fn render(&self, root: ElementRef<'_>, base: Option<&Url>, out: &mut Vec<String>) {
        let blocks = Selector::parse(BLOCK_TAGS).expect("static selector");

        for element in root.select(&blocks) {
            if inside_preformatted(element) {
                continue;
            }

            match element.value().name() {
                name @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                    let level = (name.as_bytes()[1] - b'0') as usize;
                    let text = self.clean_heading(&element_text(element));
                    out.push(format!("\n{} {}\n", "#".repeat(level), text));
                }
                "p" => {
                    let text = collapse_whitespace(&render_inline(element, base));
                    if !text.is_empty() {
                        out.push(format!("\n{text}\n"));
                    }
                }
                "pre" => out.push(self.render_code_block(element)),
                "ul" => out.push(render_list(element, false)),
                "ol" => out.push(render_list(element, true)),
                "blockquote" => out.push(render_blockquote(element)),
                "table" => {
                    if let Some(table) = render_table(element) {
                        out.push(table);
                    }
                }
                "img" => {
                    let src = element.value().attr("src").unwrap_or("");
                    let alt = element.value().attr("alt").unwrap_or("");
                    out.push(format!("\n![{}]({})\n", alt, resolve_href(base, src)));
                }
                "svg" => out.push(render_svg(element)),
                _ => {}
            }
        }
    }

    /// Strips leading `#` markers and collapses run-on whitespace.
    fn clean_heading(&self, text: &str) -> String {
        collapse_whitespace(&self.heading_prefix.replace(text, ""))
    }

    /// Emits a fenced code block. An inner `<code>` element wins over the
    /// `<pre>` itself for both the language class and the raw text.
    fn render_code_block(&self, pre: ElementRef<'_>) -> String {
        let code_sel = Selector::parse("code").expect("static selector");
        let (language, text) = match pre.select(&code_sel).next() {
            Some(code) => (self.code_language(code), element_text(code)),
            None => (self.code_language(pre), element_text(pre)),
        };
        format!("\n```{language}\n{text}```\n")
    }

    /// Scans the class list for a `language-` or `lang-` prefixed token.
    fn code_language(&self, element: ElementRef<'_>) -> String {
        if let Some(classes) = element.value().attr("class") {
            for class in classes.split_whitespace() {
                if let Some(language) = class.strip_prefix("language-") {
                    return language.to_string();
                }
                if let Some(language) = class.strip_prefix("lang-") {
                    return language.to_string();
                }
            }
        }
        self.fallback_language.clone()
    }
}

/// True when the element sits inside a `pre` or `code` ancestor.
fn inside_preformatted(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| matches!(ancestor.value().name(), "pre" | "code"))
}

/// Emits direct-child list items only; nested lists are rendered when the
/// walk reaches them as blocks of their own.
fn render_list(list: ElementRef<'_>, ordered: bool) -> String {
    let mut items = Vec::new();
    let children = list
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li");

    for (index, item) in children.enumerate() {
        let text = collapse_whitespace(&element_text(item));
        if ordered {
            items.push(format!("  {}. {}", index + 1, text));
        } else {
            items.push(format!("  - {text}"));
        }
    }

    format!("\n{}\n", items.join("\n"))
}

fn render_blockquote(quote: ElementRef<'_>) -> String {
    let text = collapse_whitespace(&element_text(quote));
    let lines: Vec<String> = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("> {line}"))
        .collect();

    format!("\n{}\n", lines.join("\n"))
}

/// Emits a pipe table. Header cells come from `thead`; without one the
/// first body row is promoted to header. Short rows are padded to the
/// header width, long rows truncated. A table with no determinable header
/// emits nothing.
fn render_table(table: ElementRef<'_>) -> Option<String> {
    let header_sel = Selector::parse("thead th").expect("static selector");
    let body_sel = Selector::parse("tbody").expect("static selector");
    let row_sel = Selector::parse("tr").expect("static selector");
    let cell_sel = Selector::parse("td, th").expect("static selector");

    let mut headers: Vec<String> = table.select(&header_sel).map(stripped_text).collect();

    let row_scope = table.select(&body_sel).next().unwrap_or(table);
    let mut rows: Vec<Vec<String>> = Vec::new();
    for row in row_scope.select(&row_sel) {
        let cells: Vec<String> = row.select(&cell_sel).map(stripped_text).collect();
        if !cells.is_empty() {
            rows.push(cells);
        }
    }

    if headers.is_empty() && !rows.is_empty() {
        headers = rows.remove(0);
    }
    if headers.is_empty() {
        return None;
    }

    let mut md = format!("\n| {} |\n", headers.join(" | "));
    md.push_str(&format!("| {} |\n", vec!["---"; headers.len()].join(" | ")));
    for mut row in rows {
        row.resize(headers.len(), String::new());
        md.push_str(&format!("| {} |\n", row.join(" | ")));
    }

    Some(md)
}

fn render_svg(svg: ElementRef<'_>) -> String {
    let title_sel = Selector::parse("title").expect("static selector");
    let title = svg
        .select(&title_sel)
        .next()
        .map(element_text)
        .unwrap_or_else(|| "Diagram".to_string());

    format!("\n*[SVG Diagram: {title}]*\n")
}

/// Text content with each fragment trimmed, concatenated without separators.
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}
