//! Interactive browsing session.
//!
//! Drives a [`Router`] from a stream of addresses, one per input line. Part
//! fetches run on their own threads so a new address can be taken while an
//! older fetch is still in flight; the router discards the stale result.
//!
//! ```text
//! reader thread ──Address / Quit──┐
//!                                 ├──▶ mpsc ──▶ driver (owns Router)
//! fetch threads ──Fetched─────────┘
//! ```
//!
//! `:q` or end of input quits. Fetches still in flight are awaited before
//! returning so the final screen is always the last address entered.

use crate::router::{Fetched, Router, Step, Surface};
use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

/// Input line that ends the session.
pub const QUIT_COMMAND: &str = ":q";

enum Event {
    Address(String),
    Fetched(Fetched),
    Quit,
}

/// Counters reported when the session ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub navigations: usize,
    /// Fetch results dropped because a newer navigation superseded them.
    pub discarded: usize,
}

fn read_addresses<R: BufRead>(input: R, tx: mpsc::Sender<Event>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read input");
                break;
            }
        };
        let line = line.trim();
        if line == QUIT_COMMAND {
            break;
        }
        if tx.send(Event::Address(line.to_string())).is_err() {
            return;
        }
    }
    let _ = tx.send(Event::Quit);
}

/// Run until quit, then wait for outstanding fetches.
pub fn run<S, R>(router: &mut Router<S>, input: R) -> SessionStats
where
    S: Surface,
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let reader_tx = tx.clone();
    let reader = thread::spawn(move || read_addresses(input, reader_tx));

    let mut stats = SessionStats::default();
    let mut in_flight = 0usize;
    let mut quitting = false;
    let mut fetchers = Vec::new();

    while !(quitting && in_flight == 0) {
        let Ok(event) = rx.recv() else { break };
        match event {
            Event::Address(fragment) => {
                stats.navigations += 1;
                if let Step::Pending(pending) = router.begin(&fragment) {
                    tracing::debug!(location = pending.location(), "Fetching part in background");
                    in_flight += 1;
                    let fetcher = router.fetcher();
                    let tx = tx.clone();
                    fetchers.push(thread::spawn(move || {
                        let _ = tx.send(Event::Fetched(pending.run(fetcher.as_ref())));
                    }));
                }
            }
            Event::Fetched(fetched) => {
                in_flight -= 1;
                if router.finish(fetched).is_none() {
                    stats.discarded += 1;
                }
            }
            Event::Quit => quitting = true,
        }
    }

    if reader.join().is_err() {
        tracing::warn!("Input reader panicked");
    }
    for handle in fetchers {
        if handle.join().is_err() {
            tracing::warn!("Fetch thread panicked");
        }
    }
    tracing::info!(
        navigations = stats.navigations,
        discarded = stats.discarded,
        "Session ended"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Route;
    use crate::test_helpers::*;
    use std::io::Cursor;
    use std::sync::Arc;

    fn router(surface: &mut RecordingSurface) -> Router<&mut RecordingSurface> {
        let fetcher = MockFetcher::new()
            .with("a.md", "# Intro")
            .with("b.md", "# Deep");
        Router::new(
            Arc::new(scenario_manifest()),
            Arc::new(fetcher),
            surface,
            chrome(),
        )
    }

    fn input(text: &str) -> Cursor<Vec<u8>> {
        Cursor::new(text.as_bytes().to_vec())
    }

    #[test]
    fn final_route_is_last_address() {
        let mut surface = RecordingSurface::default();
        let mut router = router(&mut surface);
        let stats = run(&mut router, input("#ai/intro\n#ai/deep\n"));

        assert_eq!(stats.navigations, 2);
        assert_eq!(
            router.route(),
            &Route::Part {
                series_id: "ai".into(),
                part_id: "deep".into()
            }
        );
        assert!(!router.is_loading());
        drop(router);
        assert_eq!(surface.last().document_title, "Deep Dive | AI Series");
    }

    #[test]
    fn quit_command_stops_reading() {
        let mut surface = RecordingSurface::default();
        let mut router = router(&mut surface);
        let stats = run(&mut router, input("#ai/deep\n:q\n#ai/intro\n"));

        assert_eq!(stats.navigations, 1);
        assert_eq!(router.route().to_string(), "ai/deep");
    }

    #[test]
    fn blank_line_goes_home() {
        let mut surface = RecordingSurface::default();
        let mut router = router(&mut surface);
        run(&mut router, input("#ai/intro\n\n"));
        assert_eq!(router.route(), &Route::Home);
    }

    #[test]
    fn empty_input_ends_immediately() {
        let mut surface = RecordingSurface::default();
        let mut router = router(&mut surface);
        let stats = run(&mut router, input(""));
        assert_eq!(stats, SessionStats::default());
        drop(router);
        assert!(surface.screens.is_empty());
    }
}
