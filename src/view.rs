//! Screens: what the router displays, as plain data.
//!
//! Every navigation produces a complete [`Screen`], replacing the previous one
//! wholesale. The functions here are pure: they never fetch and never touch a
//! display. Binding a screen to HTML or text is done by [`crate::html`] and
//! [`crate::output`].
//!
//! ## Screens
//!
//! | View | Document title | Header |
//! |---|---|---|
//! | Home | site title | site title / site subtitle |
//! | Part | `<part> \| <series>` | series title / part title |
//! | Error (part fetch failed) | `<part> \| <series>` | series title / part title |
//! | Error (manifest failed) | site title | site title / site subtitle |

use crate::address::Address;
use crate::fetch::FetchError;
use crate::links;
use crate::manifest::Resolved;
use crate::markdown;
use crate::types::{Manifest, Part};
use serde::Serialize;

pub const MANIFEST_ERROR_MESSAGE: &str = "Failed to load blog index. Please try again later.";
pub const PART_ERROR_MESSAGE: &str =
    "Failed to load the blog post. It might have been moved or deleted.";

/// Site-wide strings shown when no part is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chrome {
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub title: String,
    pub subtitle: String,
}

/// A complete displayable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Screen {
    pub document_title: String,
    pub header: Header,
    pub view: View,
    /// Reset the scroll position when presenting this screen.
    pub scroll_to_top: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    Home(HomeView),
    Part(PartView),
    Error(ErrorView),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeView {
    pub series: Vec<SeriesListing>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesListing {
    pub id: String,
    pub title: String,
    pub parts: Vec<PartLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartLink {
    pub href: String,
    pub title: String,
    pub description: String,
    /// Display marker for the series' introduction post.
    pub is_intro: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartView {
    pub breadcrumb: Breadcrumb,
    pub series_title: String,
    pub part_title: String,
    /// Sanitized HTML with internal links rewritten.
    pub body: String,
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub home_href: String,
    pub series_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub href: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ManifestUnavailable,
    PartUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorView {
    pub kind: ErrorKind,
    pub message: String,
}

impl View {
    pub fn is_home(&self) -> bool {
        matches!(self, View::Home(_))
    }

    pub fn as_part(&self) -> Option<&PartView> {
        match self {
            View::Part(part) => Some(part),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorView> {
        match self {
            View::Error(error) => Some(error),
            _ => None,
        }
    }
}

fn home_header(chrome: &Chrome) -> Header {
    Header {
        title: chrome.title.clone(),
        subtitle: chrome.subtitle.clone(),
    }
}

fn part_href(series_id: &str, part: &Part) -> String {
    Address::part(series_id, part.id.as_str()).to_fragment()
}

/// The home listing: every series in declared order with a link per part.
pub fn render_home(manifest: &Manifest, chrome: &Chrome) -> Screen {
    let series = manifest
        .blogs
        .iter()
        .map(|s| SeriesListing {
            id: s.id.clone(),
            title: s.title.clone(),
            parts: s
                .parts
                .iter()
                .map(|p| PartLink {
                    href: part_href(&s.id, p),
                    title: p.title.clone(),
                    description: p.description.clone(),
                    is_intro: p.is_intro(),
                })
                .collect(),
        })
        .collect();

    Screen {
        document_title: chrome.title.clone(),
        header: home_header(chrome),
        view: View::Home(HomeView { series }),
        scroll_to_top: true,
    }
}

/// The single-post screen for a resolved part, given the outcome of its fetch.
///
/// A failed fetch yields an error view in place of the post; it is never
/// merged with partial content.
pub fn render_part(resolved: &Resolved<'_>, content: Result<String, FetchError>) -> Screen {
    let series = resolved.series;
    let part = resolved.part;
    let document_title = format!("{} | {}", part.title, series.title);
    let header = Header {
        title: series.title.clone(),
        subtitle: part.title.clone(),
    };

    let markdown = match content {
        Ok(markdown) => markdown,
        Err(e) => {
            tracing::warn!(series = %series.id, part = %part.id, error = %e, "Failed to load part");
            return Screen {
                document_title,
                header,
                view: View::Error(ErrorView {
                    kind: ErrorKind::PartUnavailable,
                    message: PART_ERROR_MESSAGE.to_string(),
                }),
                scroll_to_top: false,
            };
        }
    };

    let body = links::rewrite(&markdown::to_safe_html(&markdown), &series.id);
    let nav_link = |p: &Part| NavLink {
        href: part_href(&series.id, p),
        title: p.title.clone(),
    };

    Screen {
        document_title,
        header,
        view: View::Part(PartView {
            breadcrumb: Breadcrumb {
                home_href: "#".to_string(),
                series_title: series.title.clone(),
            },
            series_title: series.title.clone(),
            part_title: part.title.clone(),
            body,
            prev: resolved.prev.map(nav_link),
            next: resolved.next.map(nav_link),
        }),
        scroll_to_top: true,
    }
}

/// The terminal screen shown when the manifest cannot be loaded.
pub fn render_manifest_error(chrome: &Chrome) -> Screen {
    Screen {
        document_title: chrome.title.clone(),
        header: home_header(chrome),
        view: View::Error(ErrorView {
            kind: ErrorKind::ManifestUnavailable,
            message: MANIFEST_ERROR_MESSAGE.to_string(),
        }),
        scroll_to_top: false,
    }
}
