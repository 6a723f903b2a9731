//! End-to-end scenarios through the [`Engine`] facade on a SQLite store.

mod common;

use queenhunt::error::{EngineError, ValidationError};
use queenhunt::recognition::RecognitionOutcome;
use queenhunt::search::Strategy;
use queenhunt::PartialBoard;

#[test]
fn two_players_race_for_the_same_solution() {
    let dir = tempfile::tempdir().unwrap();
    let engine = common::engine_on(common::open_db_store(dir.path()));
    let report = engine.run_search(Strategy::Threaded, 8).unwrap();
    assert_eq!(report.count(), 92);

    let alice = engine
        .submit_candidate(&common::FIRST_SOLUTION, "Alice")
        .unwrap();
    assert_eq!(alice.message(), "Solution recognized!");

    let bob = engine
        .submit_candidate(&common::FIRST_SOLUTION, "Bob")
        .unwrap();
    assert_eq!(bob.message(), "Solution already recognized.");

    let records = engine.list_recognition_records().unwrap();
    let record = records
        .iter()
        .find(|r| r.encoding == "[0, 4, 7, 5, 2, 6, 1, 3]")
        .unwrap();
    assert_eq!(record.recognized_by.as_deref(), Some("Alice"));
    assert_eq!(records.iter().filter(|r| r.recognized).count(), 1);
}

#[test]
fn main_diagonal_is_rejected_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let engine = common::engine_on(common::open_db_store(dir.path()));
    engine.run_search(Strategy::Sequential, 8).unwrap();

    let err = engine
        .submit_candidate(&[0, 1, 2, 3, 4, 5, 6, 7], "Alice")
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Validation(ValidationError::DiagonalConflict { first: 0, second: 1 })
    ));
    assert_eq!(engine.book().tally().unwrap(), (0, 92));
}

#[test]
fn repeated_searches_register_each_solution_once() {
    let dir = tempfile::tempdir().unwrap();
    let engine = common::engine_on(common::open_db_store(dir.path()));

    let first = engine.run_search(Strategy::Sequential, 8).unwrap();
    let second = engine.run_search(Strategy::Threaded, 8).unwrap();
    assert_eq!((first.inserted, first.rediscovered), (92, 0));
    assert_eq!((second.inserted, second.rediscovered), (0, 92));
    assert_eq!(engine.list_recognition_records().unwrap().len(), 92);

    let cmp = engine.comparison().unwrap().unwrap();
    assert!(cmp.sequential_secs >= 0.0 && cmp.threaded_secs >= 0.0);
    assert_eq!(engine.timings().unwrap().len(), 2);
}

#[test]
fn recognizing_everything_then_resetting() {
    let engine = common::engine_on(common::memory_store());
    let report = engine.run_search(Strategy::Sequential, 8).unwrap();

    for (i, board) in report.solutions.iter().enumerate() {
        assert!(!engine.are_all_recognized().unwrap());
        let outcome = engine
            .submit_candidate(board.cells(), &format!("player{}", i % 3))
            .unwrap();
        assert_eq!(outcome, RecognitionOutcome::Recognized);
    }
    assert!(engine.are_all_recognized().unwrap());

    assert_eq!(engine.reset_all().unwrap(), 92);
    assert_eq!(engine.book().tally().unwrap(), (0, 92));
    let again = engine
        .submit_candidate(&common::FIRST_SOLUTION, "Carol")
        .unwrap();
    assert!(again.is_success());
}

#[test]
fn partial_board_editing_feeds_submission() {
    let engine = common::engine_on(common::memory_store());
    engine.run_search(Strategy::Threaded, 8).unwrap();

    let mut partial = PartialBoard::new(8);
    for (row, &col) in common::FIRST_SOLUTION.iter().enumerate().take(7) {
        partial.place(row, col).unwrap();
    }
    let err = partial.to_board().unwrap_err();
    assert!(matches!(err, ValidationError::Unplaced { row: 7 }));
    assert!(err.to_string().starts_with("You must place a queen in every row."));

    // Replacing a row's queen keeps one queen per row.
    partial.place(7, 0).unwrap();
    assert_eq!(partial.placed(), 8);
    let err = partial.to_board().unwrap_err();
    assert!(err.to_string().starts_with("Queens must be in different columns."));

    partial.place(7, 3).unwrap();
    let board = partial.to_board().unwrap();
    let outcome = engine.submit_candidate(board.cells(), "Dana").unwrap();
    assert!(outcome.is_success());
}

#[test]
fn smaller_boards_are_supported() {
    let engine = queenhunt::Engine::new(common::memory_store(), 4).unwrap();
    let report = engine.run_search(Strategy::Threaded, 4).unwrap();
    assert_eq!(report.count(), 2);
    let outcome = engine.submit_candidate(&[1, 3, 0, 2], "Eve").unwrap();
    assert!(outcome.is_success());
    let err = engine
        .submit_candidate(&common::FIRST_SOLUTION, "Eve")
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Validation(ValidationError::WrongLength { expected: 4, found: 8 })
    ));
}
