//! # Errors — Typed Failure Taxonomy
//!
//! Library operations return one of the enums below; the binary wraps them in
//! `anyhow` at the edge. Negative recognition outcomes ("not found", "already
//! recognized") are *not* errors: they are values of
//! [`RecognitionOutcome`](crate::recognition::RecognitionOutcome).
//!
//! | Type | Raised by | Recoverable |
//! |------|-----------|-------------|
//! | [`ValidationError`] | board validation, candidate parsing | yes, no side effects |
//! | [`StoreError`] | the persistence port | propagated to the caller |
//! | [`SearchError`] | search entry points | fatal for that call |
//! | [`EngineError`] | the consumer facade | wraps the above |

use thiserror::Error;

/// A candidate board is malformed. Detected before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("board has {found} rows, expected {expected}")]
    WrongLength { expected: usize, found: usize },

    #[error("You must place a queen in every row. (row {row} is empty)")]
    Unplaced { row: usize },

    #[error("column {col} in row {row} is off a {size}x{size} board")]
    OutOfRange { row: usize, col: usize, size: usize },

    #[error("Queens must be in different columns. (rows {first} and {second} share column {col})")]
    ColumnConflict {
        first: usize,
        second: usize,
        col: usize,
    },

    #[error("queens in rows {first} and {second} share a diagonal")]
    DiagonalConflict { first: usize, second: usize },

    #[error("cannot parse board from {input:?}")]
    Unparseable { input: String },
}

/// The persistence port failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store lock poisoned by a panicking writer")]
    Poisoned,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("board size {size} is outside 1..={max}")]
    InvalidBoardSize { size: usize, max: usize },

    #[error("cannot search a {requested}x{requested} board with an engine set up for {expected}x{expected}")]
    BoardSizeMismatch { requested: usize, expected: usize },

    /// One or more threaded-search workers terminated abnormally. The
    /// solution set would be incomplete, so the whole call fails.
    #[error("search workers for first-row columns {columns:?} panicked")]
    WorkerPanicked { columns: Vec<usize> },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("Name cannot be empty.")]
    EmptyPlayer,

    /// The store already holds solutions for another board size.
    #[error("store holds {stored}x{stored} solutions but the board size is {expected}")]
    StoredBoardSize { stored: usize, expected: usize },
}
