//! # Store — Persistence Port
//!
//! The recognition book and the timing ledger only ever talk to a [`Store`].
//! Two collections live behind it:
//!
//! - **solutions**: key = canonical encoding, fields `recognized_by`,
//!   `recognized`. Insert-if-absent, conditional update, scan, count.
//! - **timings**: key = strategy name, field `elapsed_secs`. Upsert and get.
//!
//! Implementations must be `Send + Sync`: threaded-search workers register
//! solutions concurrently. [`Store::mark_recognized`] must perform its
//! "is it already recognized?" check and the write as one atomic step.
//!
//! Two implementations ship with the crate: [`MemoryStore`] (a `Mutex` around
//! plain collections, used by tests and `--memory`) and
//! [`DbStore`](crate::db::DbStore) (SQLite through sqlx).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::recognition::{RecognitionOutcome, RegisterOutcome};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SolutionRecord {
    pub encoding: String,
    pub recognized_by: Option<String>,
    pub recognized: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TimingEntry {
    pub strategy: String,
    pub elapsed_secs: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Predicate for [`Store::count_solutions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecognitionFilter {
    All,
    Recognized,
    Unrecognized,
}

impl RecognitionFilter {
    pub fn matches(self, record: &SolutionRecord) -> bool {
        match self {
            RecognitionFilter::All => true,
            RecognitionFilter::Recognized => record.recognized,
            RecognitionFilter::Unrecognized => !record.recognized,
        }
    }
}

pub trait Store: Send + Sync {
    /// Insert an unrecognized record unless one already exists.
    fn insert_solution(&self, encoding: &str) -> Result<RegisterOutcome, StoreError>;

    /// Atomically flip an unrecognized record to recognized, crediting
    /// `player`. Existing attribution is never overwritten.
    fn mark_recognized(&self, encoding: &str, player: &str)
        -> Result<RecognitionOutcome, StoreError>;

    /// Clear every flag and attribution; returns the number of records.
    fn reset_recognition(&self) -> Result<u64, StoreError>;

    /// All records in insertion order.
    fn solutions(&self) -> Result<Vec<SolutionRecord>, StoreError>;

    fn solution(&self, encoding: &str) -> Result<Option<SolutionRecord>, StoreError>;

    fn count_solutions(&self, filter: RecognitionFilter) -> Result<u64, StoreError>;

    fn upsert_timing(&self, strategy: &str, elapsed_secs: f64) -> Result<(), StoreError>;

    fn timing(&self, strategy: &str) -> Result<Option<TimingEntry>, StoreError>;

    /// All timing entries ordered by strategy name.
    fn timings(&self) -> Result<Vec<TimingEntry>, StoreError>;
}

// ── In-memory implementation ───────────────────────────────────

#[derive(Default)]
struct MemoryState {
    solutions: Vec<SolutionRecord>,
    index: HashMap<String, usize>,
    timings: HashMap<String, TimingEntry>,
}

/// Process-local store. Each operation holds the lock for its full duration,
/// which serializes concurrent writers.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl Store for MemoryStore {
    fn insert_solution(&self, encoding: &str) -> Result<RegisterOutcome, StoreError> {
        let mut state = self.lock()?;
        if state.index.contains_key(encoding) {
            return Ok(RegisterOutcome::AlreadyPresent);
        }
        let slot = state.solutions.len();
        state.solutions.push(SolutionRecord {
            encoding: encoding.to_string(),
            recognized_by: None,
            recognized: false,
        });
        state.index.insert(encoding.to_string(), slot);
        Ok(RegisterOutcome::Inserted)
    }

    fn mark_recognized(
        &self,
        encoding: &str,
        player: &str,
    ) -> Result<RecognitionOutcome, StoreError> {
        let mut state = self.lock()?;
        let Some(&slot) = state.index.get(encoding) else {
            return Ok(RecognitionOutcome::NotFound);
        };
        let record = &mut state.solutions[slot];
        if record.recognized {
            return Ok(RecognitionOutcome::AlreadyRecognized {
                by: record.recognized_by.clone(),
            });
        }
        record.recognized = true;
        record.recognized_by = Some(player.to_string());
        Ok(RecognitionOutcome::Recognized)
    }

    fn reset_recognition(&self) -> Result<u64, StoreError> {
        let mut state = self.lock()?;
        for record in state.solutions.iter_mut() {
            record.recognized = false;
            record.recognized_by = None;
        }
        Ok(state.solutions.len() as u64)
    }

    fn solutions(&self) -> Result<Vec<SolutionRecord>, StoreError> {
        Ok(self.lock()?.solutions.clone())
    }

    fn solution(&self, encoding: &str) -> Result<Option<SolutionRecord>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .index
            .get(encoding)
            .map(|&slot| state.solutions[slot].clone()))
    }

    fn count_solutions(&self, filter: RecognitionFilter) -> Result<u64, StoreError> {
        let state = self.lock()?;
        Ok(state.solutions.iter().filter(|r| filter.matches(r)).count() as u64)
    }

    fn upsert_timing(&self, strategy: &str, elapsed_secs: f64) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.timings.insert(
            strategy.to_string(),
            TimingEntry {
                strategy: strategy.to_string(),
                elapsed_secs,
                recorded_at: Utc::now(),
            },
        );
        Ok(())
    }

    fn timing(&self, strategy: &str) -> Result<Option<TimingEntry>, StoreError> {
        Ok(self.lock()?.timings.get(strategy).cloned())
    }

    fn timings(&self) -> Result<Vec<TimingEntry>, StoreError> {
        let mut entries: Vec<TimingEntry> = self.lock()?.timings.values().cloned().collect();
        entries.sort_by(|a, b| a.strategy.cmp(&b.strategy));
        Ok(entries)
    }
}
