//! # Timing — Latest Elapsed Time per Strategy
//!
//! A ledger keyed by strategy name. Every search run through the
//! [`Engine`](crate::engine::Engine) overwrites the entry for its strategy;
//! [`TimingLedger::comparison`] puts the two built-in strategies side by side.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::StoreError;
use crate::search::Strategy;
use crate::store::{Store, TimingEntry};

/// Sequential vs. threaded, from the latest recorded run of each.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Comparison {
    pub sequential_secs: f64,
    pub threaded_secs: f64,
    /// The strictly faster strategy; a tie goes to the threaded one.
    pub winner: Strategy,
}

impl Comparison {
    pub fn new(sequential_secs: f64, threaded_secs: f64) -> Self {
        let winner = if sequential_secs < threaded_secs {
            Strategy::Sequential
        } else {
            Strategy::Threaded
        };
        Comparison {
            sequential_secs,
            threaded_secs,
            winner,
        }
    }

    /// sequential / threaded; above 1.0 means the threaded run was faster.
    pub fn speedup(&self) -> Option<f64> {
        (self.threaded_secs > 0.0).then(|| self.sequential_secs / self.threaded_secs)
    }
}

#[derive(Clone)]
pub struct TimingLedger {
    store: Arc<dyn Store>,
}

impl TimingLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        TimingLedger { store }
    }

    pub fn record(&self, strategy: &str, elapsed: Duration) -> Result<(), StoreError> {
        debug!(strategy, elapsed_secs = elapsed.as_secs_f64(), "recording time");
        self.store.upsert_timing(strategy, elapsed.as_secs_f64())
    }

    pub fn get(&self, strategy: &str) -> Result<Option<Duration>, StoreError> {
        Ok(self
            .store
            .timing(strategy)?
            .map(|entry| Duration::from_secs_f64(entry.elapsed_secs.max(0.0))))
    }

    pub fn entries(&self) -> Result<Vec<TimingEntry>, StoreError> {
        self.store.timings()
    }

    /// `None` until both built-in strategies have been timed.
    pub fn comparison(&self) -> Result<Option<Comparison>, StoreError> {
        let seq = self.store.timing(Strategy::Sequential.name())?;
        let thr = self.store.timing(Strategy::Threaded.name())?;
        Ok(match (seq, thr) {
            (Some(seq), Some(thr)) => Some(Comparison::new(seq.elapsed_secs, thr.elapsed_secs)),
            _ => None,
        })
    }
}
