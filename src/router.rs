//! The routing state machine.
//!
//! The router has two displayed states, **Home** and **Part(series, part)**.
//! The only inputs are address changes (including the startup address); each
//! one runs a full transition:
//!
//! ```text
//! address ──parse──▶ Empty ─────────────────────────────▶ present Home
//!                    Part(s, p) ──resolve──▶ unknown ───▶ present Home
//!                                            known ─────▶ loading on
//!                                                          fetch (anywhere)
//!                                                          present Part or Error
//!                                                          loading off
//! ```
//!
//! ## Concurrent navigation
//!
//! The fetch step is split out so it can run off the driver thread:
//! [`Router::begin`] returns a [`PendingFetch`], the caller runs it, and hands
//! the [`Fetched`] result back to [`Router::finish`]. Each `begin` issues a new
//! [`NavToken`]; results carrying an older token are discarded, so a slow
//! superseded fetch never overwrites a newer screen. [`Router::navigate`] runs
//! all three steps inline.
//!
//! ## Loading flag
//!
//! Set only when a part fetch starts. Cleared when the current navigation
//! finishes, whatever the outcome, and whenever a newer navigation begins.

use crate::address::{self, Address};
use crate::fetch::{Fetch, FetchError};
use crate::manifest::ManifestError;
use crate::types::Manifest;
use crate::view::{self, Chrome, Screen};
use std::fmt;
use std::sync::Arc;

/// A display that screens are presented on.
///
/// `present` always receives a complete screen; implementations replace their
/// previous contents wholesale.
pub trait Surface {
    fn set_loading(&mut self, loading: bool);
    fn present(&mut self, screen: &Screen);
}

impl<T: Surface + ?Sized> Surface for &mut T {
    fn set_loading(&mut self, loading: bool) {
        (**self).set_loading(loading);
    }

    fn present(&mut self, screen: &Screen) {
        (**self).present(screen);
    }
}

/// The displayed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Part { series_id: String, part_id: String },
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("home"),
            Route::Part { series_id, part_id } => write!(f, "{series_id}/{part_id}"),
        }
    }
}

/// Identifies one navigation. Only the most recently issued token is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavToken(u64);

/// A part fetch that has been started but not yet run.
#[derive(Debug)]
pub struct PendingFetch {
    token: NavToken,
    series_id: String,
    part_id: String,
    location: String,
}

impl PendingFetch {
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Perform the fetch. Needs no access to the router.
    pub fn run(self, fetcher: &dyn Fetch) -> Fetched {
        let content = fetcher.fetch(&self.location);
        Fetched {
            token: self.token,
            series_id: self.series_id,
            part_id: self.part_id,
            content,
        }
    }
}

/// The outcome of a [`PendingFetch`], ready to be committed.
#[derive(Debug)]
pub struct Fetched {
    token: NavToken,
    series_id: String,
    part_id: String,
    content: Result<String, FetchError>,
}

/// Result of starting a navigation.
#[derive(Debug)]
pub enum Step {
    /// The screen has already been presented.
    Done(Route),
    /// A part fetch must run before the screen can be presented.
    Pending(PendingFetch),
}

pub struct Router<S: Surface> {
    manifest: Arc<Manifest>,
    fetcher: Arc<dyn Fetch>,
    surface: S,
    chrome: Chrome,
    route: Route,
    loading: bool,
    issued: u64,
}

impl<S: Surface> Router<S> {
    pub fn new(manifest: Arc<Manifest>, fetcher: Arc<dyn Fetch>, surface: S, chrome: Chrome) -> Self {
        Self {
            manifest,
            fetcher,
            surface,
            chrome,
            route: Route::Home,
            loading: false,
            issued: 0,
        }
    }

    /// Startup: take the manifest load result and perform the initial
    /// transition to `fragment`.
    ///
    /// A manifest failure is terminal: the error screen is presented on
    /// `surface` and no router is returned.
    pub fn boot(
        manifest: Result<Manifest, ManifestError>,
        fetcher: Arc<dyn Fetch>,
        mut surface: S,
        chrome: Chrome,
        fragment: &str,
    ) -> Result<Self, ManifestError> {
        let manifest = match manifest {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load blogs manifest");
                surface.present(&view::render_manifest_error(&chrome));
                return Err(e);
            }
        };
        let mut router = Self::new(Arc::new(manifest), fetcher, surface, chrome);
        router.navigate(fragment);
        Ok(router)
    }

    pub fn manifest(&self) -> &Arc<Manifest> {
        &self.manifest
    }

    pub fn fetcher(&self) -> Arc<dyn Fetch> {
        Arc::clone(&self.fetcher)
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Run a complete transition, fetching inline.
    pub fn navigate(&mut self, fragment: &str) -> &Route {
        if let Step::Pending(pending) = self.begin(fragment) {
            let fetched = pending.run(self.fetcher.as_ref());
            self.finish(fetched);
        }
        &self.route
    }

    /// Start a transition. Supersedes any navigation still in flight.
    pub fn begin(&mut self, fragment: &str) -> Step {
        self.issued += 1;
        let token = NavToken(self.issued);
        let address = address::parse(fragment);
        tracing::info!(%address, "Navigating");

        let Address::Part { series_id, part_id } = address else {
            return Step::Done(self.show_home());
        };
        let Some(resolved) = self.manifest.resolve(&series_id, &part_id) else {
            tracing::debug!(series = %series_id, part = %part_id, "Unresolved address, showing home");
            return Step::Done(self.show_home());
        };
        let location = resolved.part.file.clone();

        self.set_loading(true);
        Step::Pending(PendingFetch {
            token,
            series_id,
            part_id,
            location,
        })
    }

    /// Commit a fetch result. Returns `None` when a newer navigation has
    /// superseded it, in which case nothing is displayed or changed.
    pub fn finish(&mut self, fetched: Fetched) -> Option<Route> {
        if fetched.token != NavToken(self.issued) {
            tracing::debug!(
                series = %fetched.series_id,
                part = %fetched.part_id,
                "Discarding superseded fetch"
            );
            return None;
        }

        let screen = match self.manifest.resolve(&fetched.series_id, &fetched.part_id) {
            Some(resolved) => view::render_part(&resolved, fetched.content),
            None => view::render_home(&self.manifest, &self.chrome),
        };
        let route = if screen.view.is_home() {
            Route::Home
        } else {
            Route::Part {
                series_id: fetched.series_id,
                part_id: fetched.part_id,
            }
        };

        self.set_loading(false);
        self.surface.present(&screen);
        self.route = route.clone();
        Some(route)
    }

    fn show_home(&mut self) -> Route {
        self.set_loading(false);
        let screen = view::render_home(&self.manifest, &self.chrome);
        self.surface.present(&screen);
        self.route = Route::Home;
        Route::Home
    }

    fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.surface.set_loading(loading);
        }
    }
}
