//! Manifest loading, validation and lookup.
//!
//! The manifest is fetched once at startup through the same [`Fetch`] seam
//! used for part content, parsed as JSON and validated:
//!
//! - every series id is unique within the manifest
//! - every part id is unique within its series
//!
//! Any failure is reported as a [`ManifestError`]; callers treat all of them
//! as "manifest unavailable" and stop. Once loaded the manifest is never
//! mutated.

use crate::fetch::{Fetch, FetchError};
use crate::types::{Manifest, Part, Series};
use std::collections::HashSet;
use thiserror::Error;

/// Default manifest location, relative to the site root.
pub const DEFAULT_MANIFEST_LOCATION: &str = "blogs/blogs.json";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Manifest unavailable: {0}")]
    Fetch(#[from] FetchError),
    #[error("Manifest is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate series id `{0}`")]
    DuplicateSeries(String),
    #[error("Duplicate part id `{part}` in series `{series}`")]
    DuplicatePart { series: String, part: String },
}

/// A part resolved against its series, with positional neighbours.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub series: &'a Series,
    pub part: &'a Part,
    pub index: usize,
    pub prev: Option<&'a Part>,
    pub next: Option<&'a Part>,
}

/// Fetch, parse and validate the manifest at `location`.
pub fn load(fetcher: &dyn Fetch, location: &str) -> Result<Manifest, ManifestError> {
    let text = fetcher.fetch(location)?;
    let manifest = parse(&text)?;
    tracing::info!(
        location,
        series = manifest.blogs.len(),
        parts = manifest.part_count(),
        "Loaded manifest"
    );
    Ok(manifest)
}

/// Parse and validate manifest JSON.
pub fn parse(text: &str) -> Result<Manifest, ManifestError> {
    let manifest: Manifest = serde_json::from_str(text)?;
    manifest.validate()?;
    Ok(manifest)
}

impl Manifest {
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut series_ids = HashSet::new();
        for series in &self.blogs {
            if !series_ids.insert(series.id.as_str()) {
                return Err(ManifestError::DuplicateSeries(series.id.clone()));
            }
            let mut part_ids = HashSet::new();
            for part in &series.parts {
                if !part_ids.insert(part.id.as_str()) {
                    return Err(ManifestError::DuplicatePart {
                        series: series.id.clone(),
                        part: part.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn series(&self, id: &str) -> Option<&Series> {
        self.blogs.iter().find(|s| s.id == id)
    }

    /// Resolve a `(series, part)` pair. `None` when either id is unknown.
    pub fn resolve(&self, series_id: &str, part_id: &str) -> Option<Resolved<'_>> {
        let series = self.series(series_id)?;
        let index = series.parts.iter().position(|p| p.id == part_id)?;
        Some(Resolved {
            series,
            part: &series.parts[index],
            index,
            prev: index.checked_sub(1).and_then(|i| series.parts.get(i)),
            next: series.parts.get(index + 1),
        })
    }

    pub fn part_count(&self) -> usize {
        self.blogs.iter().map(|s| s.parts.len()).sum()
    }
}
