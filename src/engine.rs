//! # Engine — Consumer Facade
//!
//! The single entry point a front end (the CLI here, a board editor
//! elsewhere) needs: run a timed search, submit a candidate, and query or
//! reset recognition state. It wires the search to the recognition book as a
//! [`SolutionSink`](crate::search::SolutionSink) and records every run in the
//! timing ledger.

use std::sync::Arc;
use tracing::{info, warn};

use crate::board::{validate, Board};
use crate::error::{EngineError, SearchError, StoreError};
use crate::recognition::{RecognitionBook, RecognitionOutcome};
use crate::search::{self, check_board_size, SearchReport, SolutionSink, Strategy};
use crate::store::{SolutionRecord, Store, TimingEntry};
use crate::timing::{Comparison, TimingLedger};

#[derive(Clone)]
pub struct Engine {
    board_size: usize,
    book: RecognitionBook,
    ledger: TimingLedger,
}

impl Engine {
    /// `board_size` is the size searches run at and candidates are validated
    /// against. A store that already holds solutions of another size is
    /// refused, since those could never be recognized.
    pub fn new(store: Arc<dyn Store>, board_size: usize) -> Result<Self, EngineError> {
        check_board_size(board_size)?;
        let engine = Engine {
            board_size,
            book: RecognitionBook::new(Arc::clone(&store)),
            ledger: TimingLedger::new(store),
        };
        if let Some(record) = engine.book.list_all()?.into_iter().next() {
            let stored = record.encoding.parse::<Board>()?.size();
            if stored != board_size {
                return Err(EngineError::StoredBoardSize {
                    stored,
                    expected: board_size,
                });
            }
        }
        Ok(engine)
    }

    pub fn board_size(&self) -> usize {
        self.board_size
    }

    pub fn book(&self) -> &RecognitionBook {
        &self.book
    }

    pub fn ledger(&self) -> &TimingLedger {
        &self.ledger
    }

    /// Search, registering every solution, then record the elapsed time under
    /// the strategy name. Persistence failures end up in `report.failures`.
    /// `board_size` must match the engine's.
    pub fn run_search(
        &self,
        strategy: Strategy,
        board_size: usize,
    ) -> Result<SearchReport, SearchError> {
        if board_size != self.board_size {
            return Err(SearchError::BoardSizeMismatch {
                requested: board_size,
                expected: self.board_size,
            });
        }
        let sink: &dyn SolutionSink = &self.book;
        let mut report = search::solve(strategy, board_size, Some(sink))?;
        if let Err(e) = self.ledger.record(strategy.name(), report.elapsed) {
            warn!(strategy = strategy.name(), error = %e, "failed to record search time");
            report.failures.push(e);
        }
        Ok(report)
    }

    /// Validate `cells` as a complete solution, then try to credit `player`.
    /// Nothing is written when validation fails.
    pub fn submit_candidate(
        &self,
        cells: &[usize],
        player: &str,
    ) -> Result<RecognitionOutcome, EngineError> {
        let player = player.trim();
        if player.is_empty() {
            return Err(EngineError::EmptyPlayer);
        }
        let board: Board = validate(cells, self.board_size)?;
        let outcome = self.book.recognize(&board.encoding(), player)?;
        info!(
            solution = %board,
            player,
            outcome = outcome.message(),
            "candidate submitted"
        );
        Ok(outcome)
    }

    pub fn are_all_recognized(&self) -> Result<bool, StoreError> {
        self.book.all_recognized()
    }

    pub fn reset_all(&self) -> Result<u64, StoreError> {
        self.book.reset_all()
    }

    pub fn list_recognition_records(&self) -> Result<Vec<SolutionRecord>, StoreError> {
        self.book.list_all()
    }

    pub fn timings(&self) -> Result<Vec<TimingEntry>, StoreError> {
        self.ledger.entries()
    }

    pub fn comparison(&self) -> Result<Option<Comparison>, StoreError> {
        self.ledger.comparison()
    }
}
