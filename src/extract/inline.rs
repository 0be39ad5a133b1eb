use super::resolve_href;
use scraper::ElementRef;
use url::Url;

/// Renders an element's direct children as one inline Markdown string.
///
/// Text nodes pass through raw; code spans, anchors, strong/bold and
/// em/italic children get their Markdown wrappers; any other inline child
/// contributes its plain text. Only one level of formatting is considered:
/// markup nested inside a recognized child is flattened to text.
pub fn render_inline(element: ElementRef<'_>, base: Option<&Url>) -> String {
    let mut out = String::new();

    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            match child_el.value().name() {
                "code" => {
                    out.push('`');
                    out.push_str(&element_text(child_el));
                    out.push('`');
                }
                "a" => {
                    let href = child_el.value().attr("href").unwrap_or("");
                    out.push_str(&format!(
                        "[{}]({})",
                        element_text(child_el),
                        resolve_href(base, href)
                    ));
                }
                "strong" | "b" => {
                    out.push_str(&format!("**{}**", element_text(child_el)));
                }
                "em" | "i" => {
                    out.push_str(&format!("*{}*", element_text(child_el)));
                }
                _ => out.push_str(&element_text(child_el)),
            }
        }
    }

    out
}

/// Concatenated text of an element and all its descendants.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
