//! Manifest types shared by the store, the view functions and the CLI.
//!
//! These mirror the on-disk `blogs.json` document exactly. Every field is
//! required; a manifest missing any of them fails to load.

use serde::{Deserialize, Serialize};

/// Sentinel part id that receives the intro marker on the home listing.
pub const INTRO_PART_ID: &str = "intro";

/// The full listing of series, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub blogs: Vec<Series>,
}

/// A named, ordered collection of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    /// Stable id used as the first address token
    pub id: String,
    pub title: String,
    /// Ordering is significant: it defines prev/next adjacency.
    pub parts: Vec<Part>,
}

/// A single post within a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Id unique within the owning series, used as the second address token
    pub id: String,
    pub title: String,
    pub description: String,
    /// Location of the markdown source, relative to the site root or absolute
    pub file: String,
}

impl Part {
    pub fn is_intro(&self) -> bool {
        self.id == INTRO_PART_ID
    }
}
