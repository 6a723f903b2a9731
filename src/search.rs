//! # Search — Backtracking Enumeration of Non-Attacking Placements
//!
//! [`Solutions`] is a lazy depth-first walk: at each row it tries columns in
//! ascending order, extends the board with the first square that passes
//! [`is_safe`], and backtracks when a row has no safe column left. Complete
//! boards are yielded in a fixed order (for N=8 the first is
//! `[0, 4, 7, 5, 2, 6, 1, 3]` and there are 92 in total).
//!
//! The walker knows nothing about accumulation or persistence; the two
//! strategies below drain it and decide what happens to each board.
//!
//! ## Strategies
//!
//! - [`solve_sequential`]: one walker from the empty board, on the caller's
//!   thread.
//! - [`solve_threaded`]: one rayon task per first-row column `c`, each
//!   draining a walker seeded with `[c]`. The subtrees are disjoint (their
//!   first cell differs) so no two tasks can produce the same board. Each task
//!   accumulates locally; after the join the outputs are merged in column
//!   order, which makes the merged vector identical to the sequential one.
//!
//! ## Registration
//!
//! Every board is handed to the optional [`SolutionSink`] as it is found.
//! Sink failures are tallied in the [`SearchReport`] and never stop the walk:
//! search results are not lost because persistence is down.
//!
//! ## Worker Failure
//!
//! Each threaded task runs under `catch_unwind`. If any task panics the call
//! returns [`SearchError::WorkerPanicked`] naming every failed column instead
//! of a partial solution set.

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::board::{is_safe, Board};
use crate::error::{SearchError, StoreError, ValidationError};
use crate::progress::{Progress, SearchStats};
use crate::recognition::RegisterOutcome;

/// Largest board the engine accepts. The threaded strategy spawns one task
/// per column, and the solution count grows roughly 7x per extra row past 8.
pub const MAX_BOARD_SIZE: usize = 12;

/// Receives every board a search emits. Implemented by
/// [`RecognitionBook`](crate::recognition::RecognitionBook); must tolerate
/// concurrent calls from threaded-search workers.
pub trait SolutionSink: Sync {
    fn register(&self, solution: &Board) -> Result<RegisterOutcome, StoreError>;
}

/// Execution mode of a search. The name is also the key the timing ledger
/// stores the elapsed time under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Sequential,
    /// First-row split across parallel workers.
    Threaded,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Sequential, Strategy::Threaded];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Threaded => "threaded",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(Strategy::Sequential),
            "threaded" | "parallel" | "par" => Ok(Strategy::Threaded),
            other => Err(format!(
                "unknown strategy '{}' (expected sequential or threaded)",
                other
            )),
        }
    }
}

pub fn check_board_size(size: usize) -> Result<(), SearchError> {
    if (1..=MAX_BOARD_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(SearchError::InvalidBoardSize {
            size,
            max: MAX_BOARD_SIZE,
        })
    }
}

// ── Lazy walker ─────────────────────────────────────────────────

/// Depth-first iterator over complete non-attacking boards.
///
/// Rows below `floor` belong to the seed prefix and are never revisited.
pub struct Solutions {
    size: usize,
    board: Vec<usize>,
    floor: usize,
    next_col: usize,
    exhausted: bool,
    stats: SearchStats,
}

impl Solutions {
    /// Every solution of a `size`x`size` board.
    pub fn new(size: usize) -> Self {
        Self::seeded(size, Vec::new())
    }

    /// Every solution whose first rows equal `prefix`.
    pub fn from_prefix(size: usize, prefix: &[usize]) -> Result<Self, ValidationError> {
        if prefix.len() > size {
            return Err(ValidationError::WrongLength {
                expected: size,
                found: prefix.len(),
            });
        }
        for (row, &col) in prefix.iter().enumerate() {
            if col >= size {
                return Err(ValidationError::OutOfRange { row, col, size });
            }
            for (first, &other) in prefix[..row].iter().enumerate() {
                if other == col {
                    return Err(ValidationError::ColumnConflict {
                        first,
                        second: row,
                        col,
                    });
                }
                if other.abs_diff(col) == row - first {
                    return Err(ValidationError::DiagonalConflict { first, second: row });
                }
            }
        }
        Ok(Self::seeded(size, prefix.to_vec()))
    }

    fn seeded(size: usize, prefix: Vec<usize>) -> Self {
        Solutions {
            size,
            floor: prefix.len(),
            board: prefix,
            next_col: 0,
            exhausted: false,
            stats: SearchStats::default(),
        }
    }

    /// Counters for the part of the tree walked so far.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Undo the deepest placement and resume from the column after it.
    /// Returns false once the walk would cross into the seed prefix.
    fn backtrack(&mut self) -> bool {
        if self.board.len() <= self.floor {
            self.exhausted = true;
            return false;
        }
        match self.board.pop() {
            Some(last) => {
                self.next_col = last + 1;
                true
            }
            None => {
                self.exhausted = true;
                false
            }
        }
    }
}

impl Iterator for Solutions {
    type Item = Board;

    fn next(&mut self) -> Option<Board> {
        while !self.exhausted {
            let row = self.board.len();
            if row == self.size {
                let solution = Board::from_cells(self.board.clone());
                self.stats.found += 1;
                self.backtrack();
                return Some(solution);
            }
            let start = self.next_col;
            match (start..self.size).find(|&col| is_safe(&self.board, row, col)) {
                Some(col) => {
                    self.board.push(col);
                    self.next_col = 0;
                    self.stats.placements += 1;
                }
                None => {
                    if start == 0 {
                        self.stats.dead_ends += 1;
                    }
                    self.backtrack();
                }
            }
        }
        None
    }
}

// ── Reports ─────────────────────────────────────────────────────

#[derive(Debug)]
pub struct SearchReport {
    pub strategy: Strategy,
    pub board_size: usize,
    /// All solutions, in depth-first order for both strategies.
    pub solutions: Vec<Board>,
    pub elapsed: Duration,
    pub stats: SearchStats,
    /// Boards the sink had not seen before.
    pub inserted: u64,
    /// Boards the sink already held from an earlier run.
    pub rediscovered: u64,
    /// Persistence failures collected during the search (and, when run through
    /// the engine, while recording the elapsed time).
    pub failures: Vec<StoreError>,
}

impl SearchReport {
    pub fn count(&self) -> usize {
        self.solutions.len()
    }

    pub fn solution_set(&self) -> BTreeSet<Board> {
        self.solutions.iter().cloned().collect()
    }

    /// True if every side effect succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Per-worker registration tallies.
#[derive(Default)]
struct Registration {
    inserted: u64,
    rediscovered: u64,
    failures: Vec<StoreError>,
}

impl Registration {
    fn record(&mut self, sink: Option<&dyn SolutionSink>, board: &Board) {
        let Some(sink) = sink else {
            return;
        };
        match sink.register(board) {
            Ok(RegisterOutcome::Inserted) => self.inserted += 1,
            Ok(RegisterOutcome::AlreadyPresent) => self.rediscovered += 1,
            Err(e) => {
                warn!(solution = %board, error = %e, "failed to register solution");
                self.failures.push(e);
            }
        }
    }

    fn merge(&mut self, other: Registration) {
        self.inserted += other.inserted;
        self.rediscovered += other.rediscovered;
        self.failures.extend(other.failures);
    }
}

fn finish(
    strategy: Strategy,
    size: usize,
    solutions: Vec<Board>,
    registration: Registration,
    progress: &Progress,
    started: Instant,
) -> SearchReport {
    let elapsed = started.elapsed();
    progress.log_status(strategy.name());
    info!(
        strategy = strategy.name(),
        board_size = size,
        solutions = solutions.len(),
        inserted = registration.inserted,
        rediscovered = registration.rediscovered,
        failures = registration.failures.len(),
        elapsed_ms = format_args!("{:.3}", elapsed.as_secs_f64() * 1000.0),
        "search complete"
    );
    SearchReport {
        strategy,
        board_size: size,
        solutions,
        elapsed,
        stats: progress.snapshot(),
        inserted: registration.inserted,
        rediscovered: registration.rediscovered,
        failures: registration.failures,
    }
}

// ── Strategies ──────────────────────────────────────────────────

pub fn solve(
    strategy: Strategy,
    size: usize,
    sink: Option<&dyn SolutionSink>,
) -> Result<SearchReport, SearchError> {
    match strategy {
        Strategy::Sequential => solve_sequential(size, sink),
        Strategy::Threaded => solve_threaded(size, sink),
    }
}

/// Depth-first search from the empty board on the calling thread.
pub fn solve_sequential(
    size: usize,
    sink: Option<&dyn SolutionSink>,
) -> Result<SearchReport, SearchError> {
    check_board_size(size)?;
    let started = Instant::now();
    let progress = Progress::new();
    let mut registration = Registration::default();
    let mut solutions = Vec::new();

    let mut walker = Solutions::new(size);
    for board in walker.by_ref() {
        registration.record(sink, &board);
        solutions.push(board);
    }
    progress.absorb(walker.stats());

    Ok(finish(
        Strategy::Sequential,
        size,
        solutions,
        registration,
        &progress,
        started,
    ))
}

struct WorkerOutput {
    solutions: Vec<Board>,
    registration: Registration,
}

fn run_worker(
    size: usize,
    first_col: usize,
    sink: Option<&dyn SolutionSink>,
    progress: &Progress,
) -> WorkerOutput {
    let mut registration = Registration::default();
    let mut solutions = Vec::new();
    let mut walker = Solutions::seeded(size, vec![first_col]);
    for board in walker.by_ref() {
        registration.record(sink, &board);
        solutions.push(board);
    }
    let mut stats = walker.stats();
    // The seed queen counts as a placement, as it does in the sequential walk.
    stats.placements += 1;
    progress.absorb(stats);
    WorkerOutput {
        solutions,
        registration,
    }
}

/// One parallel task per first-row column; blocks until all have finished.
pub fn solve_threaded(
    size: usize,
    sink: Option<&dyn SolutionSink>,
) -> Result<SearchReport, SearchError> {
    check_board_size(size)?;
    let started = Instant::now();
    let progress = Progress::new();

    let outputs: Vec<(usize, std::thread::Result<WorkerOutput>)> = (0..size)
        .into_par_iter()
        .map(|col| {
            let result =
                panic::catch_unwind(AssertUnwindSafe(|| run_worker(size, col, sink, &progress)));
            (col, result)
        })
        .collect();

    let mut registration = Registration::default();
    let mut solutions = Vec::new();
    let mut panicked = Vec::new();
    for (col, output) in outputs {
        match output {
            Ok(output) => {
                solutions.extend(output.solutions);
                registration.merge(output.registration);
            }
            Err(_) => panicked.push(col),
        }
    }
    if !panicked.is_empty() {
        error!(columns = ?panicked, "threaded search workers panicked");
        return Err(SearchError::WorkerPanicked { columns: panicked });
    }

    Ok(finish(
        Strategy::Threaded,
        size,
        solutions,
        registration,
        &progress,
        started,
    ))
}

// ── Random solution ─────────────────────────────────────────────

/// One solution picked at random: depth-first search with the column order
/// shuffled independently at every row. Returns `None` for sizes with no
/// solution (2 and 3).
pub fn random_solution<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Option<Board> {
    fn place<R: Rng + ?Sized>(board: &mut Vec<usize>, size: usize, rng: &mut R) -> bool {
        let row = board.len();
        if row == size {
            return true;
        }
        let mut cols: Vec<usize> = (0..size).collect();
        cols.shuffle(rng);
        for col in cols {
            if is_safe(board, row, col) {
                board.push(col);
                if place(board, size, rng) {
                    return true;
                }
                board.pop();
            }
        }
        false
    }

    let mut board = Vec::with_capacity(size);
    place(&mut board, size, rng).then(|| Board::from_cells(board))
}
