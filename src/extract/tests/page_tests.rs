use crate::extract::{ExtractOptions, PageExtractor};

const PAGE_URL: &str = "https://example.com/docs";

fn extractor() -> PageExtractor {
    PageExtractor::new(&ExtractOptions::default())
}

#[test]
fn test_header_section_with_description() {
    let result = extractor().extract(
        r#"<html><head><title> My Page </title>
           <meta name="description" content="Short summary"></head>
           <body><p>Body text</p></body></html>"#,
        PAGE_URL,
    );

    assert_eq!(result.title.as_deref(), Some("My Page"));
    assert!(result.markdown.starts_with(
        "# My Page\n\n**URL:** https://example.com/docs\n\n**Description:** Short summary\n\n---\n"
    ));
    assert!(result.markdown.contains("\nBody text\n"));
}

#[test]
fn test_header_without_description() {
    let result = extractor().extract(
        "<html><head><title>T</title></head><body><p>x</p></body></html>",
        PAGE_URL,
    );

    assert!(!result.markdown.contains("**Description:**"));
    assert!(result.markdown.contains("**URL:** https://example.com/docs"));
}

#[test]
fn test_missing_title_yields_empty_heading() {
    let result = extractor().extract("<body><p>x</p></body>", PAGE_URL);

    assert!(result.title.is_none());
    assert!(result.markdown.starts_with("# \n"));
}

#[test]
fn test_empty_content_still_emits_header() {
    let result = extractor().extract(
        "<html><head><title>Bare</title></head><body></body></html>",
        PAGE_URL,
    );

    assert_eq!(
        result.markdown,
        "# Bare\n\n**URL:** https://example.com/docs\n\n---\n"
    );
}

#[test]
fn test_boilerplate_never_reaches_output() {
    let result = extractor().extract(
        r#"<body>
            <nav><p>NavText</p></nav>
            <header><p>HeaderText</p></header>
            <aside><p>AsideText</p></aside>
            <footer><p>FooterText</p></footer>
            <script>var x = 1;</script>
            <style>p { color: red }</style>
            <main><p>RealText</p></main>
        </body>"#,
        PAGE_URL,
    );

    assert!(result.markdown.contains("RealText"));
    for boilerplate in ["NavText", "HeaderText", "AsideText", "FooterText", "var x", "color"] {
        assert!(
            !result.markdown.contains(boilerplate),
            "boilerplate {boilerplate:?} leaked into output"
        );
    }
}

#[test]
fn test_content_outside_root_is_ignored() {
    let result = extractor().extract(
        r#"<body><div class="sidebar"><p>Sidebar</p></div>
           <article><p>Article body</p></article></body>"#,
        PAGE_URL,
    );

    assert!(result.markdown.contains("Article body"));
    assert!(!result.markdown.contains("Sidebar"));
}

#[test]
fn test_full_page_end_to_end() {
    let result = extractor().extract(
        r#"<html><head><title>Guide</title></head><body><main>
            <h1># Guide</h1>
            <p>Install with <code>cargo add</code> then read <a href="/next">more</a>.</p>
            <pre><code class="language-toml">[dependencies]
</code></pre>
            <ul><li>fast</li><li>safe</li></ul>
        </main></body></html>"#,
        PAGE_URL,
    );

    let markdown = &result.markdown;
    assert!(markdown.starts_with("# Guide\n"));
    assert!(markdown.contains("\n# Guide\n"));
    assert!(
        markdown.contains("\nInstall with `cargo add` then read [more](https://example.com/next).\n")
    );
    assert!(markdown.contains("\n```toml\n[dependencies]\n```\n"));
    assert!(markdown.contains("\n  - fast\n  - safe\n"));
}
