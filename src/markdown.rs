//! Markdown to safe HTML.
//!
//! Both steps are delegated: `pulldown-cmark` renders, `ammonia` sanitizes.
//! Part content is untrusted input fetched at runtime, so the sanitizer always
//! runs before the HTML reaches a view.

use pulldown_cmark::{Options, Parser, html};

/// Render markdown to (unsanitized) HTML with the GitHub-flavoured extensions
/// posts are written in.
pub fn render(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Strip scripts, event handlers and unsafe URLs from rendered HTML.
///
/// Code block language classes survive so client-side highlighting keeps
/// working.
pub fn sanitize(html: &str) -> String {
    ammonia::Builder::default()
        .add_tag_attributes("code", &["class"])
        .clean(html)
        .to_string()
}

/// `sanitize(render(markdown))`.
pub fn to_safe_html(markdown: &str) -> String {
    sanitize(&render(markdown))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let html = render("# Title\n\nThis is **bold** and *italic*.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn renders_tables() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn renders_strikethrough() {
        assert!(render("~~gone~~").contains("<del>gone</del>"));
    }

    #[test]
    fn sanitize_removes_script() {
        let clean = sanitize("<p>hi</p><script>alert('xss')</script>");
        assert!(clean.contains("<p>hi</p>"));
        assert!(!clean.contains("<script"));
        assert!(!clean.contains("alert"));
    }

    #[test]
    fn sanitize_removes_event_handlers() {
        let clean = sanitize(r#"<img src="a.png" onerror="alert(1)">"#);
        assert!(!clean.contains("onerror"));
    }

    #[test]
    fn sanitize_drops_javascript_urls() {
        let clean = sanitize(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!clean.contains("javascript:"));
    }

    #[test]
    fn sanitize_keeps_relative_links() {
        let clean = sanitize(r#"<a href="./sibling.md">next</a>"#);
        assert!(clean.contains(r#"href="./sibling.md""#));
    }

    #[test]
    fn raw_html_in_markdown_is_sanitized() {
        let html = to_safe_html("Hello <script>alert(1)</script> world");
        assert!(!html.contains("<script"));
        assert!(html.contains("Hello"));
    }

    #[test]
    fn code_language_class_survives() {
        let html = to_safe_html("```rust\nfn main() {}\n```\n");
        assert!(html.contains(r#"class="language-rust""#));
    }
}
