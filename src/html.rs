//! HTML display surface.
//!
//! Binds a [`Screen`] to a complete HTML document using
//! [maud](https://maud.lambda.xyz/). All interpolated text is escaped; the only
//! pre-escaped input is a part body, which has already been sanitized.
//!
//! ## Document Layout
//!
//! ```text
//! <header id="site-header">     link to "#", #header-title, #header-subtitle
//! <div id="loader">             visible only while a part is loading
//! <main id="content">           the view, replaced wholesale per screen
//! ```
//!
//! The stylesheet is embedded at compile time from `static/style.css`.

use crate::router::Surface;
use crate::view::{ErrorView, HomeView, PartView, Screen, View};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::io::{self, Write};

const CSS: &str = include_str!("../static/style.css");

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the clickable site header. Clicking it navigates home.
fn site_header(title: &str, subtitle: &str) -> Markup {
    html! {
        header #site-header {
            a.site-home href="#" {
                h1 #header-title { (title) }
                p #header-subtitle { (subtitle) }
            }
        }
    }
}

fn loader(loading: bool) -> Markup {
    let display = if loading { "display: block" } else { "display: none" };
    html! {
        div #loader style=(display) { "Loading…" }
    }
}

// ============================================================================
// View Renderers
// ============================================================================

fn render_home(home: &HomeView) -> Markup {
    html! {
        @for series in &home.series {
            div.series-group {
                h2.series-heading { (series.title) }
                ul.parts-list {
                    @for part in &series.parts {
                        li {
                            a.blog-link.intro-link[part.is_intro] href=(part.href) {
                                span.blog-title { (part.title) }
                                span.blog-meta { (part.description) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_part(part: &PartView) -> Markup {
    html! {
        nav.breadcrumb {
            a href=(part.breadcrumb.home_href) { "Home" }
            " "
            span { "/" }
            " "
            (part.breadcrumb.series_title)
        }
        article.content {
            (PreEscaped(&part.body))
        }
        div.navigation-links {
            @if let Some(prev) = &part.prev {
                a.prev href=(prev.href) { "← " (prev.title) }
            } @else {
                span {}
            }
            @if let Some(next) = &part.next {
                a.next href=(next.href) { (next.title) " →" }
            } @else {
                span {}
            }
        }
    }
}

fn render_error(error: &ErrorView) -> Markup {
    html! {
        div.error { (error.message) }
    }
}

fn render_view(view: &View) -> Markup {
    match view {
        View::Home(home) => render_home(home),
        View::Part(part) => render_part(part),
        View::Error(error) => render_error(error),
    }
}

/// Renders a screen as a full HTML document.
pub fn render_document(screen: &Screen, loading: bool) -> Markup {
    let content = html! {
        (site_header(&screen.header.title, &screen.header.subtitle))
        (loader(loading))
        main #content {
            (render_view(&screen.view))
        }
    };
    base_document(&screen.document_title, content)
}

// ============================================================================
// Surface
// ============================================================================

/// Writes a full document to `out` every time a screen is presented.
///
/// Write failures are kept and reported by [`HtmlSurface::finish`]; the
/// first one stops further output.
pub struct HtmlSurface<W: Write> {
    out: W,
    loading: bool,
    error: Option<io::Error>,
}

impl<W: Write> HtmlSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            loading: false,
            error: None,
        }
    }

    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }
}

impl<W: Write> Surface for HtmlSurface<W> {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn present(&mut self, screen: &Screen) {
        if self.error.is_some() {
            return;
        }
        let document = render_document(screen, self.loading).into_string();
        if let Err(e) = writeln!(self.out, "{document}").and_then(|()| self.out.flush()) {
            tracing::error!(error = %e, "Failed to write document");
            self.error = Some(e);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
