//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use queenhunt::db::DbStore;
use queenhunt::store::{MemoryStore, Store};
use queenhunt::Engine;

/// The first solution in depth-first order on the 8x8 board.
pub const FIRST_SOLUTION: [usize; 8] = [0, 4, 7, 5, 2, 6, 1, 3];

/// `sqlite://` URL for a database file inside `dir`.
pub fn sqlite_url(dir: &Path) -> String {
    format!("sqlite://{}", dir.join("queenhunt.db").display())
}

/// Open (creating on first use) the SQLite store in `dir`.
pub fn open_db_store(dir: &Path) -> Arc<dyn Store> {
    Arc::new(DbStore::open(&sqlite_url(dir)).expect("Failed to open test database"))
}

pub fn memory_store() -> Arc<dyn Store> {
    Arc::new(MemoryStore::new())
}

/// Both store implementations, each with a label for assertion messages.
/// The returned tempdir must be kept alive for the SQLite store.
pub fn all_stores() -> (tempfile::TempDir, Vec<(&'static str, Arc<dyn Store>)>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let stores = vec![("memory", memory_store()), ("sqlite", open_db_store(dir.path()))];
    (dir, stores)
}

pub fn engine_on(store: Arc<dyn Store>) -> Engine {
    Engine::new(store, 8).expect("8 is a valid board size")
}
