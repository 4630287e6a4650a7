//! CLI text output.
//!
//! # Information-First Display
//!
//! Every entity is shown by its semantic identity first (positional index and
//! title), with addresses and source locations as secondary context, either
//! after an arrow or on indented lines.
//!
//! # Output Format
//!
//! ## Home
//!
//! ```text
//! General Agentic Software Design
//!     Architecting the future of AI-driven engineering.
//!
//! AI Series
//! 001 Intro [intro] → #ai/intro
//!     Where it starts
//! 002 Deep Dive → #ai/deep
//!     Going further
//! ```
//!
//! ## Part
//!
//! ```text
//! AI Series
//!     Deep Dive
//! Home / AI Series
//!
//! <body as plain text>
//!
//! Previous: Intro → #ai/intro
//! ```
//!
//! ## Check
//!
//! ```text
//! AI Series
//! 001 Intro → ai/intro.md
//!     OK (1204 bytes)
//! 002 Deep Dive → ai/deep.md
//!     Unresolved link: #ai/basics
//!
//! Checked 2 parts, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper or surface that writes it. Format
//! functions are pure.

use crate::check::{self, SeriesCheck};
use crate::router::Surface;
use crate::view::{ErrorView, HomeView, PartView, Screen, View};
use std::io::{self, Write};

/// Description lines on the home screen are cut to this many characters.
const DESCRIPTION_WIDTH: usize = 72;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Undo the entity escaping the sanitizer applies to text.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Rendered HTML body as plain text lines, with runs of blank lines collapsed.
fn body_lines(html: &str) -> Vec<String> {
    let text = decode_entities(&strip_html_tags(html));
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        let blank = line.trim().is_empty();
        if blank && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(if blank { String::new() } else { line.to_string() });
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

// ============================================================================
// Screens
// ============================================================================

fn format_home(home: &HomeView) -> Vec<String> {
    let mut lines = Vec::new();
    for series in &home.series {
        lines.push(String::new());
        lines.push(series.title.clone());
        for (i, part) in series.parts.iter().enumerate() {
            let marker = if part.is_intro { " [intro]" } else { "" };
            lines.push(format!(
                "{} {}{} → {}",
                format_index(i + 1),
                part.title,
                marker,
                part.href
            ));
            if !part.description.is_empty() {
                lines.push(format!(
                    "{}{}",
                    indent(1),
                    truncate_desc(&part.description, DESCRIPTION_WIDTH)
                ));
            }
        }
    }
    lines
}

fn format_part(part: &PartView) -> Vec<String> {
    let mut lines = vec![format!("Home / {}", part.breadcrumb.series_title)];
    lines.push(String::new());
    lines.extend(body_lines(&part.body));

    let prev = part.prev.as_ref().map(|l| format!("Previous: {} → {}", l.title, l.href));
    let next = part.next.as_ref().map(|l| format!("Next: {} → {}", l.title, l.href));
    if prev.is_some() || next.is_some() {
        lines.push(String::new());
    }
    lines.extend(prev);
    lines.extend(next);
    lines
}

fn format_error(error: &ErrorView) -> Vec<String> {
    vec![String::new(), format!("Error: {}", error.message)]
}

/// Format a complete screen: header, then the view.
pub fn format_screen(screen: &Screen) -> Vec<String> {
    let mut lines = vec![
        screen.header.title.clone(),
        format!("{}{}", indent(1), screen.header.subtitle),
    ];
    match &screen.view {
        View::Home(home) => lines.extend(format_home(home)),
        View::Part(part) => lines.extend(format_part(part)),
        View::Error(error) => lines.extend(format_error(error)),
    }
    lines
}

/// Prints every presented screen as text, separated by a rule.
///
/// Write failures are kept and reported by [`TextSurface::finish`]; the
/// first one stops further output.
pub struct TextSurface<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> TextSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    fn write_lines(&mut self, lines: &[String]) {
        if self.error.is_some() {
            return;
        }
        let result = lines
            .iter()
            .try_for_each(|line| writeln!(self.out, "{line}"))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::error!(error = %e, "Failed to write screen");
            self.error = Some(e);
        }
    }
}

impl<W: Write> Surface for TextSurface<W> {
    fn set_loading(&mut self, loading: bool) {
        if loading {
            self.write_lines(&["Loading…".to_string()]);
        }
    }

    fn present(&mut self, screen: &Screen) {
        let mut lines = format_screen(screen);
        lines.push("─".repeat(40));
        self.write_lines(&lines);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the result of `check`: one entry per part, then a summary line.
pub fn format_check_report(checks: &[SeriesCheck]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut total = 0;
    for (s, series) in checks.iter().enumerate() {
        if s > 0 {
            lines.push(String::new());
        }
        lines.push(series.title.clone());
        for (i, part) in series.parts.iter().enumerate() {
            total += 1;
            lines.push(format!(
                "{} {} → {}",
                format_index(i + 1),
                part.title,
                part.file
            ));
            match &part.outcome {
                Ok(stats) if stats.unresolved_links.is_empty() => {
                    lines.push(format!("{}OK ({} bytes)", indent(1), stats.bytes));
                }
                Ok(stats) => {
                    for link in &stats.unresolved_links {
                        lines.push(format!("{}Unresolved link: {link}", indent(1)));
                    }
                }
                Err(e) => lines.push(format!("{}Error: {e}", indent(1))),
            }
        }
    }

    let failed = check::failure_count(checks);
    lines.push(String::new());
    let noun = if total == 1 { "part" } else { "parts" };
    lines.push(format!("Checked {total} {noun}, {failed} failed"));
    lines
}

pub fn print_check_report(checks: &[SeriesCheck]) {
    for line in format_check_report(checks) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{PartCheck, PartStats};
    use crate::test_helpers::*;
    use crate::view::{self, render_home};
    use pretty_assertions::assert_eq;

    fn part_screen(part_id: &str, body: &str) -> Screen {
        let manifest = scenario_manifest();
        let resolved = manifest.resolve("ai", part_id).unwrap();
        view::render_part(&resolved, Ok(body.to_string()))
    }

    #[test]
    fn home_screen_lists_parts() {
        let lines = format_screen(&render_home(&scenario_manifest(), &chrome()));
        assert_eq!(
            lines,
            vec![
                "Test Site",
                "    Testing things",
                "",
                "AI Series",
                "001 Intro [intro] → #ai/intro",
                "    d1",
                "002 Deep Dive → #ai/deep",
                "    d2",
            ]
        );
    }

    #[test]
    fn part_screen_shows_header_body_and_nav() {
        let lines = format_screen(&part_screen("intro", "# Hello\n\nSome *text* & more."));
        assert_eq!(
            lines,
            vec![
                "AI Series",
                "    Intro",
                "Home / AI Series",
                "",
                "Hello",
                "Some text & more.",
                "",
                "Next: Deep Dive → #ai/deep",
            ]
        );
    }

    #[test]
    fn last_part_shows_prev_only() {
        let lines = format_screen(&part_screen("deep", "x"));
        assert_eq!(lines.last().unwrap(), "Previous: Intro → #ai/intro");
        assert!(!lines.iter().any(|l| l.starts_with("Next:")));
    }

    #[test]
    fn error_screen_shows_message() {
        let lines = format_screen(&view::render_manifest_error(&chrome()));
        assert_eq!(
            lines.last().unwrap(),
            "Error: Failed to load blog index. Please try again later."
        );
    }

    #[test]
    fn truncate_desc_is_char_safe() {
        assert_eq!(truncate_desc("héllo wörld", 5), "héllo...");
        assert_eq!(truncate_desc("short", 10), "short");
    }

    #[test]
    fn strip_and_decode_body() {
        assert_eq!(
            body_lines("<p>a &lt;b&gt; &amp; c</p>\n\n\n<p>d</p>\n"),
            vec!["a <b> & c", "d"]
        );
    }

    #[test]
    fn text_surface_prints_loading_and_screens() {
        let mut surface = TextSurface::new(Vec::new());
        surface.set_loading(true);
        surface.present(&part_screen("deep", "x"));
        surface.set_loading(false);
        let out = String::from_utf8(surface.finish().unwrap()).unwrap();
        assert!(out.starts_with("Loading…\nAI Series\n"));
        assert_eq!(out.matches("Loading…").count(), 1);
    }

    #[test]
    fn check_report_format() {
        let checks = vec![SeriesCheck {
            id: "ai".into(),
            title: "AI Series".into(),
            parts: vec![
                PartCheck {
                    id: "intro".into(),
                    title: "Intro".into(),
                    file: "ai/intro.md".into(),
                    outcome: Ok(PartStats {
                        bytes: 12,
                        unresolved_links: vec![],
                    }),
                },
                PartCheck {
                    id: "deep".into(),
                    title: "Deep".into(),
                    file: "ai/deep.md".into(),
                    outcome: Ok(PartStats {
                        bytes: 3,
                        unresolved_links: vec!["#ai/basics".into()],
                    }),
                },
                PartCheck {
                    id: "gone".into(),
                    title: "Gone".into(),
                    file: "ai/gone.md".into(),
                    outcome: Err("HTTP 404 fetching ai/gone.md".into()),
                },
            ],
        }];
        assert_eq!(
            format_check_report(&checks),
            vec![
                "AI Series",
                "001 Intro → ai/intro.md",
                "    OK (12 bytes)",
                "002 Deep → ai/deep.md",
                "    Unresolved link: #ai/basics",
                "003 Gone → ai/gone.md",
                "    Error: HTTP 404 fetching ai/gone.md",
                "",
                "Checked 3 parts, 2 failed",
            ]
        );
    }
}
