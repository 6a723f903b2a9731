//! Recognition book behavior over both store implementations, plus SQLite
//! persistence across reopen.

mod common;

use std::sync::Arc;
use std::thread;

use queenhunt::recognition::{RecognitionBook, RecognitionOutcome, RegisterOutcome};
use queenhunt::store::{RecognitionFilter, Store};
use queenhunt::timing::TimingLedger;
use std::time::Duration;

const KEY: &str = "[0, 4, 7, 5, 2, 6, 1, 3]";
const OTHER: &str = "[0, 5, 7, 2, 6, 3, 1, 4]";

// ── Shared contract ─────────────────────────────────────────────

#[test]
fn register_is_insert_if_absent() {
    let (_dir, stores) = common::all_stores();
    for (name, store) in stores {
        let book = RecognitionBook::new(store);
        assert_eq!(book.register_encoding(KEY).unwrap(), RegisterOutcome::Inserted, "{}", name);
        book.recognize(KEY, "Alice").unwrap();
        assert_eq!(
            book.register_encoding(KEY).unwrap(),
            RegisterOutcome::AlreadyPresent,
            "{}",
            name
        );
        let record = book.get(KEY).unwrap().unwrap();
        assert!(record.recognized, "{}: re-registering must not clear state", name);
        assert_eq!(record.recognized_by.as_deref(), Some("Alice"), "{}", name);
    }
}

#[test]
fn first_recognizer_keeps_the_credit() {
    let (_dir, stores) = common::all_stores();
    for (name, store) in stores {
        let book = RecognitionBook::new(store);
        book.register_encoding(KEY).unwrap();
        assert_eq!(book.recognize(KEY, "Alice").unwrap(), RecognitionOutcome::Recognized);
        let second = book.recognize(KEY, "Bob").unwrap();
        assert_eq!(second.message(), "Solution already recognized.", "{}", name);
        assert_eq!(
            second,
            RecognitionOutcome::AlreadyRecognized {
                by: Some("Alice".to_string())
            }
        );
        assert_eq!(
            book.get(KEY).unwrap().unwrap().recognized_by.as_deref(),
            Some("Alice"),
            "{}",
            name
        );
    }
}

#[test]
fn unknown_encoding_is_not_found_and_not_created() {
    let (_dir, stores) = common::all_stores();
    for (name, store) in stores {
        let book = RecognitionBook::new(store);
        let outcome = book.recognize(OTHER, "Alice").unwrap();
        assert_eq!(outcome.message(), "Solution not found.", "{}", name);
        assert!(book.get(OTHER).unwrap().is_none(), "{}", name);
    }
}

#[test]
fn all_recognized_and_reset() {
    let (_dir, stores) = common::all_stores();
    for (name, store) in stores {
        let book = RecognitionBook::new(store);
        assert!(book.all_recognized().unwrap(), "{}: empty book is vacuously done", name);

        book.register_encoding(KEY).unwrap();
        book.register_encoding(OTHER).unwrap();
        assert!(!book.all_recognized().unwrap(), "{}", name);

        book.recognize(KEY, "Alice").unwrap();
        book.recognize(OTHER, "Bob").unwrap();
        assert!(book.all_recognized().unwrap(), "{}", name);
        assert_eq!(book.tally().unwrap(), (2, 2), "{}", name);

        assert_eq!(book.reset_all().unwrap(), 2, "{}", name);
        assert_eq!(book.tally().unwrap(), (0, 2), "{}", name);
        for record in book.list_all().unwrap() {
            assert!(!record.recognized, "{}", name);
            assert_eq!(record.recognized_by, None, "{}", name);
        }
        assert!(book.reset_all().is_ok(), "{}: reset is idempotent", name);
    }
}

#[test]
fn list_all_preserves_insertion_order() {
    let (_dir, stores) = common::all_stores();
    for (name, store) in stores {
        let book = RecognitionBook::new(store);
        book.register_encoding(OTHER).unwrap();
        book.register_encoding(KEY).unwrap();
        let keys: Vec<String> = book.list_all().unwrap().into_iter().map(|r| r.encoding).collect();
        assert_eq!(keys, vec![OTHER.to_string(), KEY.to_string()], "{}", name);
    }
}

#[test]
fn concurrent_recognition_credits_exactly_one_player() {
    let (_dir, stores) = common::all_stores();
    for (name, store) in stores {
        let book = RecognitionBook::new(store);
        book.register_encoding(KEY).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let book = book.clone();
                thread::spawn(move || book.recognize(KEY, &format!("player{}", i)).unwrap())
            })
            .collect();
        let outcomes: Vec<RecognitionOutcome> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winners = outcomes.iter().filter(|o| o.is_success()).count();
        assert_eq!(winners, 1, "{}", name);
        let credited = book.get(KEY).unwrap().unwrap().recognized_by.unwrap();
        for outcome in &outcomes {
            if let RecognitionOutcome::AlreadyRecognized { by } = outcome {
                assert_eq!(by.as_deref(), Some(credited.as_str()), "{}", name);
            }
        }
    }
}

// ── SQLite persistence ──────────────────────────────────────────

#[test]
fn sqlite_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = common::open_db_store(dir.path());
        let book = RecognitionBook::new(Arc::clone(&store));
        book.register_encoding(KEY).unwrap();
        book.register_encoding(OTHER).unwrap();
        book.recognize(KEY, "Alice").unwrap();
        TimingLedger::new(store)
            .record("sequential", Duration::from_millis(250))
            .unwrap();
    }

    let store = common::open_db_store(dir.path());
    assert_eq!(store.count_solutions(RecognitionFilter::All).unwrap(), 2);
    assert_eq!(store.count_solutions(RecognitionFilter::Recognized).unwrap(), 1);
    let record = store.solution(KEY).unwrap().unwrap();
    assert_eq!(record.recognized_by.as_deref(), Some("Alice"));
    assert_eq!(
        TimingLedger::new(store).get("sequential").unwrap(),
        Some(Duration::from_millis(250))
    );
}

#[test]
fn opening_twice_does_not_duplicate_or_clear() {
    let dir = tempfile::tempdir().unwrap();
    let first = common::open_db_store(dir.path());
    first.insert_solution(KEY).unwrap();
    let second = common::open_db_store(dir.path());
    assert_eq!(second.count_solutions(RecognitionFilter::All).unwrap(), 1);
    assert_eq!(
        second.insert_solution(KEY).unwrap(),
        RegisterOutcome::AlreadyPresent
    );
}
