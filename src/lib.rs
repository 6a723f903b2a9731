//! Eight Queens puzzle engine.
//!
//! Exhaustive backtracking search ([`search`]) with a sequential and a
//! threaded strategy, a recognition book that tracks which solutions players
//! have found ([`recognition`]), a per-strategy timing ledger ([`timing`]),
//! and the persistence port both sit on ([`store`], [`db`]). [`engine::Engine`]
//! ties them together for front ends.

pub mod board;
pub mod db;
pub mod engine;
pub mod error;
pub mod progress;
pub mod recognition;
pub mod search;
pub mod store;
pub mod timing;

pub use board::{is_safe, validate, Board, PartialBoard, BOARD_SIZE};
pub use engine::Engine;
pub use error::{EngineError, SearchError, StoreError, ValidationError};
pub use recognition::{RecognitionBook, RecognitionOutcome, RegisterOutcome};
pub use search::{solve_sequential, solve_threaded, SearchReport, Solutions, Strategy};
pub use store::{MemoryStore, Store};
pub use timing::TimingLedger;
