//! # Progress — Atomic Search Counters
//!
//! Thread-safe tallies shared by every worker of a search call. Workers keep
//! their own local counts while walking a subtree and flush them here with a
//! single `fetch_add` per counter when the subtree is exhausted, so the
//! atomics see N updates per threaded search rather than one per node.
//!
//! ## Counters
//!
//! - `placements`: queens placed on a safe square (search-tree nodes).
//! - `dead_ends`: rows where no column was safe and the search backtracked.
//! - `found`: complete boards emitted.
//!
//! A [`SearchStats`] snapshot is attached to every
//! [`SearchReport`](crate::search::SearchReport).

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Point-in-time copy of the search counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub placements: u64,
    pub dead_ends: u64,
    pub found: u64,
}

pub struct Progress {
    pub placements: AtomicU64,
    pub dead_ends: AtomicU64,
    pub found: AtomicU64,
    start: Instant,
}

impl Progress {
    pub fn new() -> Self {
        Progress {
            placements: AtomicU64::new(0),
            dead_ends: AtomicU64::new(0),
            found: AtomicU64::new(0),
            start: Instant::now(),
        }
    }

    /// Add a worker's local tallies.
    pub fn absorb(&self, stats: SearchStats) {
        self.placements
            .fetch_add(stats.placements, Ordering::Relaxed);
        self.dead_ends.fetch_add(stats.dead_ends, Ordering::Relaxed);
        self.found.fetch_add(stats.found, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SearchStats {
        SearchStats {
            placements: self.placements.load(Ordering::Relaxed),
            dead_ends: self.dead_ends.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
        }
    }

    pub fn log_status(&self, strategy: &str) {
        let stats = self.snapshot();
        let elapsed = self.start.elapsed();
        let rate = if elapsed.as_secs_f64() > 0.0 {
            stats.placements as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        info!(
            strategy,
            placements = stats.placements,
            dead_ends = stats.dead_ends,
            found = stats.found,
            rate = format_args!("{:.0}", rate),
            elapsed_ms = elapsed.as_millis() as u64,
            "search progress"
        );
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    //! Counter initialization, absorb/snapshot, and concurrent absorb from
    //! many threads (the threaded search flushes one batch per worker).

    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn counters_start_at_zero() {
        let p = Progress::new();
        assert_eq!(p.snapshot(), SearchStats::default());
    }

    #[test]
    fn absorb_adds_every_counter() {
        let p = Progress::new();
        p.absorb(SearchStats {
            placements: 10,
            dead_ends: 4,
            found: 1,
        });
        p.absorb(SearchStats {
            placements: 5,
            dead_ends: 0,
            found: 2,
        });
        assert_eq!(
            p.snapshot(),
            SearchStats {
                placements: 15,
                dead_ends: 4,
                found: 3
            }
        );
    }

    // ── Concurrent Absorb ──────────────────────────────────────────

    /// Eight workers each flush 1000 batches; nothing may be lost.
    #[test]
    fn concurrent_absorb_is_accurate() {
        let p = Arc::new(Progress::new());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let p = Arc::clone(&p);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        p.absorb(SearchStats {
                            placements: 3,
                            dead_ends: 2,
                            found: 1,
                        });
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(
            p.snapshot(),
            SearchStats {
                placements: 24_000,
                dead_ends: 16_000,
                found: 8_000
            }
        );
    }

    /// Logging right after creation must not divide by zero.
    #[test]
    fn log_status_with_zero_elapsed() {
        let p = Progress::new();
        p.log_status("sequential");
    }
}
