//! # Database — SQLite Storage Layer
//!
//! Async operations over a `sqlx::SqlitePool`, plus [`DbStore`], the sync
//! adapter that plugs the database into the [`Store`] port.
//!
//! ## Schema
//!
//! - `solutions`: solution (unique canonical encoding), recognized_by,
//!   recognized
//! - `times`: method (strategy name, primary key), time_taken, recorded_at
//!
//! Created with `CREATE TABLE IF NOT EXISTS` on every connect, so opening an
//! existing database never touches its rows.
//!
//! ## Module Structure
//!
//! - [`solutions`]: insert-if-absent, atomic recognize, reset, scan, count
//! - [`timings`]: upsert and lookup of per-strategy times
//!
//! ## Sync Wrapper
//!
//! Search workers run on rayon threads (no Tokio runtime). [`DbStore`] bridges
//! each async call with `Runtime::block_on`. This is safe
//! because rayon threads are not Tokio tasks and won't deadlock the executor.
//! Never call a `DbStore` method from inside an async context.

mod solutions;
mod timings;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::error::StoreError;
use crate::recognition::{RecognitionOutcome, RegisterOutcome};
use crate::store::{RecognitionFilter, SolutionRecord, Store, TimingEntry};

const SCHEMA: &str = include_str!("../../migrations/001_create_tables.sql");

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the SQLite database at `database_url`, e.g.
    /// `sqlite://queenhunt.db` or `sqlite::memory:`, and ensure the schema.
    ///
    /// The pool holds a single long-lived connection: SQLite serializes
    /// writers anyway, and an in-memory database lives only as long as its
    /// connection.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;
        let db = Database { pool };
        db.init_schema().await?;
        debug!(database_url, "database ready");
        Ok(db)
    }

    /// Idempotent schema creation.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Execute `SELECT 1` to verify the connection.
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

// ── Sync adapter ────────────────────────────────────────────────

/// [`Store`] backed by a [`Database`], driven through its own Tokio runtime.
pub struct DbStore {
    db: Database,
    // Declared after `db` so the pool is dropped while the runtime is alive.
    rt: tokio::runtime::Runtime,
}

impl DbStore {
    /// Build a private runtime and connect. For synchronous callers (the CLI
    /// and tests) that have no runtime of their own.
    pub fn open(database_url: &str) -> Result<Self, StoreError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| StoreError::Unavailable(format!("tokio runtime: {}", e)))?;
        let db = runtime.block_on(Database::connect(database_url))?;
        Ok(DbStore { db, rt: runtime })
    }
}

impl Store for DbStore {
    fn insert_solution(&self, encoding: &str) -> Result<RegisterOutcome, StoreError> {
        self.rt.block_on(self.db.insert_solution_ignore(encoding))
    }

    fn mark_recognized(
        &self,
        encoding: &str,
        player: &str,
    ) -> Result<RecognitionOutcome, StoreError> {
        self.rt.block_on(self.db.mark_recognized(encoding, player))
    }

    fn reset_recognition(&self) -> Result<u64, StoreError> {
        self.rt.block_on(self.db.reset_recognition())
    }

    fn solutions(&self) -> Result<Vec<SolutionRecord>, StoreError> {
        self.rt.block_on(self.db.get_solutions())
    }

    fn solution(&self, encoding: &str) -> Result<Option<SolutionRecord>, StoreError> {
        self.rt.block_on(self.db.get_solution(encoding))
    }

    fn count_solutions(&self, filter: RecognitionFilter) -> Result<u64, StoreError> {
        self.rt.block_on(self.db.count_solutions(filter))
    }

    fn upsert_timing(&self, strategy: &str, elapsed_secs: f64) -> Result<(), StoreError> {
        self.rt.block_on(self.db.upsert_timing(strategy, elapsed_secs))
    }

    fn timing(&self, strategy: &str) -> Result<Option<TimingEntry>, StoreError> {
        self.rt.block_on(self.db.get_timing(strategy))
    }

    fn timings(&self) -> Result<Vec<TimingEntry>, StoreError> {
        self.rt.block_on(self.db.get_timings())
    }
}
