//! Fragment address parsing.
//!
//! The navigational address is the fragment portion of the current location:
//!
//! ```text
//! ""                  → Empty (home)
//! "#ai/intro"         → Part { series_id: "ai", part_id: "intro" }
//! "ai/intro"          → same; the leading `#` is optional
//! "ai" / "ai/" / "/x" → Empty (malformed falls back to home)
//! ```
//!
//! Parsing never consults the manifest. Whether the ids resolve is decided by
//! the router at dispatch time.

use std::fmt;

const SEPARATOR: char = '/';

/// A decoded navigational address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    Empty,
    Part { series_id: String, part_id: String },
}

impl Address {
    pub fn part(series_id: impl Into<String>, part_id: impl Into<String>) -> Self {
        Address::Part {
            series_id: series_id.into(),
            part_id: part_id.into(),
        }
    }

    /// Renders the address as an in-app link target (`""` or `"#series/part"`).
    pub fn to_fragment(&self) -> String {
        match self {
            Address::Empty => String::new(),
            Address::Part { series_id, part_id } => format!("#{series_id}{SEPARATOR}{part_id}"),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Empty => f.write_str("(home)"),
            Address::Part { series_id, part_id } => write!(f, "{series_id}{SEPARATOR}{part_id}"),
        }
    }
}

/// Parse a raw fragment into an [`Address`].
///
/// Only the first two `/`-separated tokens are considered. Anything that is
/// not two non-empty tokens is treated as the home address.
pub fn parse(raw_fragment: &str) -> Address {
    let fragment = raw_fragment.trim();
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    if fragment.is_empty() {
        return Address::Empty;
    }

    let mut tokens = fragment.split(SEPARATOR);
    match (tokens.next(), tokens.next()) {
        (Some(series_id), Some(part_id)) if !series_id.is_empty() && !part_id.is_empty() => {
            Address::part(series_id, part_id)
        }
        _ => Address::Empty,
    }
}
