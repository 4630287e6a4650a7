//! Site validation.
//!
//! Fetches every part listed in the manifest and renders it through the same
//! pipeline the router uses, reporting:
//!
//! - parts whose source cannot be fetched
//! - internal links that point at a part id missing from the current series
//!
//! The second check surfaces the cross-series limitation of the link
//! rewriter: a bare filename naming another series' post resolves into the
//! current series and usually lands on an unknown id.

use crate::fetch::Fetch;
use crate::links;
use crate::markdown;
use crate::types::{Manifest, Series};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesCheck {
    pub id: String,
    pub title: String,
    pub parts: Vec<PartCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartCheck {
    pub id: String,
    pub title: String,
    pub file: String,
    pub outcome: Result<PartStats, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartStats {
    pub bytes: usize,
    /// In-app addresses (`#series/part`) that do not resolve.
    pub unresolved_links: Vec<String>,
}

impl PartCheck {
    pub fn is_ok(&self) -> bool {
        matches!(&self.outcome, Ok(stats) if stats.unresolved_links.is_empty())
    }
}

/// Check every part of every series, in manifest order.
pub fn check(manifest: &Manifest, fetcher: &dyn Fetch) -> Vec<SeriesCheck> {
    manifest
        .blogs
        .iter()
        .map(|series| SeriesCheck {
            id: series.id.clone(),
            title: series.title.clone(),
            parts: series
                .parts
                .iter()
                .map(|part| PartCheck {
                    id: part.id.clone(),
                    title: part.title.clone(),
                    file: part.file.clone(),
                    outcome: fetcher
                        .fetch(&part.file)
                        .map(|markdown| stats(series, &markdown))
                        .map_err(|e| e.to_string()),
                })
                .collect(),
        })
        .collect()
}

fn stats(series: &Series, markdown: &str) -> PartStats {
    let html = markdown::to_safe_html(markdown);
    let unresolved_links = links::internal_targets(&html)
        .into_iter()
        .filter(|id| !series.parts.iter().any(|p| &p.id == id))
        .map(|id| format!("#{}/{id}", series.id))
        .collect();
    PartStats {
        bytes: markdown.len(),
        unresolved_links,
    }
}

/// Number of parts that failed to fetch or have unresolved links.
pub fn failure_count(checks: &[SeriesCheck]) -> usize {
    checks
        .iter()
        .flat_map(|s| &s.parts)
        .filter(|p| !p.is_ok())
        .count()
}
