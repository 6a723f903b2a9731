//! # Recognition — Per-Solution Discovery State
//!
//! Every solution the search produces gets a record, keyed by its canonical
//! encoding, that starts out unrecognized. A player "recognizes" a solution by
//! submitting it; the first player to do so is credited and later attempts
//! are refused until the whole book is reset.
//!
//! ```text
//!   register (insert-if-absent)
//!          │
//!          ▼
//!   Unrecognized ──recognize(player)──▶ Recognized
//!          ▲                                │
//!          └────────────reset_all───────────┘
//! ```
//!
//! The book is a thin layer over the [`Store`]: the check-then-write of
//! `recognize` is a single store call so it stays atomic per encoding even
//! with concurrent callers.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::board::Board;
use crate::error::StoreError;
use crate::search::SolutionSink;
use crate::store::{RecognitionFilter, SolutionRecord, Store};

/// Result of insert-if-absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RegisterOutcome {
    Inserted,
    AlreadyPresent,
}

/// Result of a recognition attempt. Only `Recognized` changes state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum RecognitionOutcome {
    Recognized,
    /// Someone got there first; carries the original record's attribution.
    AlreadyRecognized { by: Option<String> },
    NotFound,
}

impl RecognitionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RecognitionOutcome::Recognized)
    }

    /// User-facing message. These exact strings are part of the contract.
    pub fn message(&self) -> &'static str {
        match self {
            RecognitionOutcome::Recognized => "Solution recognized!",
            RecognitionOutcome::AlreadyRecognized { .. } => "Solution already recognized.",
            RecognitionOutcome::NotFound => "Solution not found.",
        }
    }
}

#[derive(Clone)]
pub struct RecognitionBook {
    store: Arc<dyn Store>,
}

impl RecognitionBook {
    pub fn new(store: Arc<dyn Store>) -> Self {
        RecognitionBook { store }
    }

    pub fn register(&self, solution: &Board) -> Result<RegisterOutcome, StoreError> {
        self.register_encoding(&solution.encoding())
    }

    /// Insert-if-absent. An existing record is left exactly as it was.
    pub fn register_encoding(&self, encoding: &str) -> Result<RegisterOutcome, StoreError> {
        let outcome = self.store.insert_solution(encoding)?;
        if outcome == RegisterOutcome::Inserted {
            debug!(encoding, "registered new solution");
        }
        Ok(outcome)
    }

    pub fn recognize(&self, encoding: &str, player: &str) -> Result<RecognitionOutcome, StoreError> {
        let outcome = self.store.mark_recognized(encoding, player)?;
        match &outcome {
            RecognitionOutcome::Recognized => info!(encoding, player, "solution recognized"),
            other => debug!(encoding, player, outcome = ?other, "recognition refused"),
        }
        Ok(outcome)
    }

    /// True iff no stored record is unrecognized (vacuously true when empty).
    pub fn all_recognized(&self) -> Result<bool, StoreError> {
        Ok(self
            .store
            .count_solutions(RecognitionFilter::Unrecognized)?
            == 0)
    }

    /// Clear every recognition flag and attribution. Returns the number of
    /// records in the book.
    pub fn reset_all(&self) -> Result<u64, StoreError> {
        let touched = self.store.reset_recognition()?;
        info!(records = touched, "recognition state reset");
        Ok(touched)
    }

    pub fn list_all(&self) -> Result<Vec<SolutionRecord>, StoreError> {
        self.store.solutions()
    }

    pub fn get(&self, encoding: &str) -> Result<Option<SolutionRecord>, StoreError> {
        self.store.solution(encoding)
    }

    /// (recognized, total)
    pub fn tally(&self) -> Result<(u64, u64), StoreError> {
        Ok((
            self.store.count_solutions(RecognitionFilter::Recognized)?,
            self.store.count_solutions(RecognitionFilter::All)?,
        ))
    }
}

impl SolutionSink for RecognitionBook {
    fn register(&self, solution: &Board) -> Result<RegisterOutcome, StoreError> {
        RecognitionBook::register(self, solution)
    }
}
