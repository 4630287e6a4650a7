//! # Blog Router
//!
//! A fragment-addressed reader for markdown blog series. A JSON manifest
//! lists series and their ordered parts; each part is a markdown file. The
//! router maps an address like `#ai/intro` to a screen, fetching and
//! rendering the part on demand.
//!
//! # Architecture: Screens as Data
//!
//! ```text
//! address ──▶ router ──▶ manifest lookup ──▶ fetch ──▶ markdown ──▶ links
//!                                                                    │
//!                       surface (HTML / text) ◀──── Screen ◀─────────┘
//! ```
//!
//! Every navigation produces a complete [`view::Screen`], a plain value with
//! no markup in it apart from the sanitized part body. Surfaces decide how a
//! screen is shown. Router tests run against a recording surface and a mock
//! fetcher.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Manifest data: series and their ordered parts |
//! | [`manifest`] | Loading, validation, and `(series, part)` resolution with neighbours |
//! | [`address`] | Fragment parsing: `#series/part` or empty |
//! | [`fetch`] | The `Fetch` seam and the file / HTTP implementation |
//! | [`markdown`] | Markdown to sanitized HTML |
//! | [`links`] | Rewrites relative post links to in-app addresses |
//! | [`view`] | Pure screen construction for home, part and error states |
//! | [`router`] | The navigation state machine, loading flag, and stale-result discard |
//! | [`session`] | Interactive driver with background fetch threads |
//! | [`html`] | HTML document surface, rendered with Maud |
//! | [`output`] | Text surface and CLI report formatting |
//! | [`check`] | Fetches every part and reports broken sources and links |
//! | [`config`] | `config.toml` loading, validation, and merging |
//!
//! # Design Decisions
//!
//! ## No Caching
//!
//! Each visit to a part fetches it again, including revisits and
//! back-and-forth between neighbours. Edits to a source show up on the next
//! visit.
//!
//! ## Unknown Addresses Fall Back Home
//!
//! An address naming an unknown series or part shows the home screen with no
//! error and no fetch. Only a manifest failure is terminal.

pub mod address;
pub mod check;
pub mod config;
pub mod fetch;
pub mod html;
pub mod links;
pub mod manifest;
pub mod markdown;
pub mod output;
pub mod router;
pub mod session;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
