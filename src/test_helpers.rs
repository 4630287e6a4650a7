//! Shared test utilities for the blog-router test suite.
//!
//! Provides manifest builders, the canonical two-part `ai` scenario, a
//! recording [`Fetch`] double and a recording [`Surface`].
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let manifest = manifest_of(vec![series("ai", &["intro", "deep"])]);
//! let fetcher = MockFetcher::new().with("ai/intro.md", "# Intro");
//! assert_eq!(part_ids(&manifest.blogs[0]), vec!["intro", "deep"]);
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use crate::fetch::{Fetch, FetchError};
use crate::router::Surface;
use crate::types::{Manifest, Part, Series};
use crate::view::{Chrome, Screen};

// =========================================================================
// Manifest fixtures
// =========================================================================

/// One series "ai" with an intro and a deep-dive part.
pub const SCENARIO_JSON: &str = r#"{"blogs":[{"id":"ai","title":"AI Series","parts":[
    {"id":"intro","title":"Intro","description":"d1","file":"a.md"},
    {"id":"deep","title":"Deep Dive","description":"d2","file":"b.md"}
]}]}"#;

pub fn scenario_manifest() -> Manifest {
    serde_json::from_str(SCENARIO_JSON).unwrap()
}

pub fn manifest_of(blogs: Vec<Series>) -> Manifest {
    Manifest { blogs }
}

/// A series whose parts are titled after their ids and stored at
/// `<series>/<part>.md`.
pub fn series(id: &str, part_ids: &[&str]) -> Series {
    Series {
        id: id.to_string(),
        title: format!("Series {id}"),
        parts: part_ids
            .iter()
            .map(|p| Part {
                id: p.to_string(),
                title: format!("Part {p}"),
                description: format!("About {p}"),
                file: format!("{id}/{p}.md"),
            })
            .collect(),
    }
}

pub fn part_ids(series: &Series) -> Vec<&str> {
    series.parts.iter().map(|p| p.id.as_str()).collect()
}

pub fn chrome() -> Chrome {
    Chrome {
        title: "Test Site".to_string(),
        subtitle: "Testing things".to_string(),
    }
}

// =========================================================================
// Fetch double
// =========================================================================

/// Serves fixed documents by location and records every request.
/// Unknown locations answer with HTTP 404.
#[derive(Default)]
pub struct MockFetcher {
    documents: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: &str, body: &str) -> Self {
        self.documents.insert(location.to_string(), body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetch for MockFetcher {
    fn fetch(&self, location: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(location.to_string());
        self.documents
            .get(location)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: location.to_string(),
                status: 404,
            })
    }
}

// =========================================================================
// Surface double
// =========================================================================

/// Keeps every presented screen and every loading toggle, plus the loading
/// state each screen was presented under.
#[derive(Default)]
pub struct RecordingSurface {
    pub screens: Vec<Screen>,
    pub loading_changes: Vec<bool>,
    pub loading_at_present: Vec<bool>,
}

impl RecordingSurface {
    /// The screen currently displayed. Panics if nothing was presented.
    pub fn last(&self) -> &Screen {
        self.screens
            .last()
            .unwrap_or_else(|| panic!("no screen presented"))
    }
}

impl Surface for RecordingSurface {
    fn set_loading(&mut self, loading: bool) {
        self.loading_changes.push(loading);
    }

    fn present(&mut self, screen: &Screen) {
        let loading = self.loading_changes.last().copied().unwrap_or(false);
        self.loading_at_present.push(loading);
        self.screens.push(screen.clone());
    }
}
