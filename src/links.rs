//! In-app link rewriting for rendered part content.
//!
//! Posts link to each other by source filename (`./part-two.md`,
//! `Part-Two.html`). After rendering, those links are rewritten to fragment
//! addresses within the series being viewed:
//!
//! ```text
//! ./sibling.md            → #ai/sibling
//! notes/Deep-Dive.html    → #ai/deep-dive
//! https://x.com/y.md      → unchanged (absolute)
//! #ai/intro               → unchanged (already in-app)
//! ./diagram.png           → unchanged (not a post)
//! ```
//!
//! Links are always resolved into the *current* series. A bare filename that
//! names a part of another series is not detected; authors must link across
//! series with a full `#series/part` address.

use regex::{Captures, Regex};
use std::sync::LazyLock;

const POST_EXTENSIONS: [&str; 2] = [".md", ".html"];

/// `<a ...href="...">`, capturing the prefix, the target and the closing quote.
/// Sanitized HTML always double-quotes attribute values.
static ANCHOR_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(<a\b[^>]*?\shref=")([^"]*)(")"#).unwrap());

/// Rewrite every internal post link in `html` to an address in `series_id`.
pub fn rewrite(html: &str, series_id: &str) -> String {
    ANCHOR_HREF
        .replace_all(html, |caps: &Captures| {
            let href = &caps[2];
            match internal_part_id(href) {
                Some(part_id) => {
                    tracing::trace!(href, series = series_id, part = %part_id, "Rewrote link");
                    format!("{}#{series_id}/{part_id}{}", &caps[1], &caps[3])
                }
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Part ids of every internal post link in `html`, in document order.
pub fn internal_targets(html: &str) -> Vec<String> {
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|caps| internal_part_id(&caps[2]))
        .collect()
}

/// The part id a link target refers to, if it is a relative post link.
pub fn internal_part_id(href: &str) -> Option<String> {
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let relative = href.starts_with("./") || !href.contains("://");
    if !relative || !POST_EXTENSIONS.iter().any(|ext| href.ends_with(ext)) {
        return None;
    }

    let filename = href.rsplit('/').next().unwrap_or(href);
    let stem = POST_EXTENSIONS
        .iter()
        .fold(filename.to_string(), |name, ext| name.replacen(ext, "", 1));
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(href: &str) -> String {
        format!(r#"<p><a href="{href}" rel="noopener noreferrer">text</a></p>"#)
    }

    #[test]
    fn dot_slash_markdown_link_rewritten() {
        assert_eq!(rewrite(&link("./sibling.md"), "ai"), link("#ai/sibling"));
    }

    #[test]
    fn bare_markdown_link_rewritten() {
        assert_eq!(rewrite(&link("sibling.md"), "ai"), link("#ai/sibling"));
    }

    #[test]
    fn html_link_rewritten() {
        assert_eq!(rewrite(&link("pages/other.html"), "ai"), link("#ai/other"));
    }

    #[test]
    fn part_id_is_lowercased() {
        assert_eq!(rewrite(&link("./Deep-Dive.md"), "ai"), link("#ai/deep-dive"));
    }

    #[test]
    fn absolute_link_untouched() {
        let html = link("https://x.com/y.md");
        assert_eq!(rewrite(&html, "ai"), html);
    }

    #[test]
    fn non_post_link_untouched() {
        let html = link("./diagram.png");
        assert_eq!(rewrite(&html, "ai"), html);
    }

    #[test]
    fn link_with_anchor_untouched() {
        let html = link("./sibling.md#section");
        assert_eq!(rewrite(&html, "ai"), html);
    }

    #[test]
    fn in_app_address_untouched() {
        let html = link("#ml/intro");
        assert_eq!(rewrite(&html, "ai"), html);
    }

    #[test]
    fn rewrite_is_idempotent() {
        let html = format!(
            "{}{}{}",
            link("./a.md"),
            link("https://x.com/y.md"),
            link("B.html")
        );
        let once = rewrite(&html, "ai");
        assert_eq!(rewrite(&once, "ai"), once);
    }

    #[test]
    fn cross_series_filename_resolves_into_current_series() {
        assert_eq!(
            rewrite(&link("../ml/intro.md"), "ai"),
            link("#ai/intro")
        );
    }

    #[test]
    fn rewrites_every_anchor() {
        let html = format!("{}{}", link("a.md"), link("b.md"));
        let out = rewrite(&html, "s");
        assert!(out.contains(r##"href="#s/a""##));
        assert!(out.contains(r##"href="#s/b""##));
    }

    #[test]
    fn attributes_before_href_preserved() {
        let html = r#"<a title="t" href="./x.md">x</a>"#;
        assert_eq!(rewrite(html, "ai"), r##"<a title="t" href="#ai/x">x</a>"##);
    }

    #[test]
    fn non_anchor_href_untouched() {
        let html = r#"<link href="./style.html">"#;
        assert_eq!(rewrite(html, "ai"), html);
    }

    #[test]
    fn internal_targets_lists_post_links() {
        let html = format!(
            "{}{}{}",
            link("./A.md"),
            link("https://x.com/y.md"),
            link("b.html")
        );
        assert_eq!(internal_targets(&html), vec!["a", "b"]);
    }

    #[test]
    fn internal_part_id_cases() {
        assert_eq!(internal_part_id("./Intro.md").as_deref(), Some("intro"));
        assert_eq!(internal_part_id("a/b/c.html").as_deref(), Some("c"));
        assert_eq!(internal_part_id("http://x/y.md"), None);
        assert_eq!(internal_part_id(""), None);
        assert_eq!(internal_part_id(".md"), None);
    }
}
