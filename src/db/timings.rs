//! Strategy timing operations.
//!
//! The `times` table holds one row per strategy name. Recording a run upserts
//! on `method`, so the table always shows the latest time for each strategy.

use super::Database;
use crate::error::StoreError;
use crate::store::TimingEntry;

impl Database {
    /// Upsert the elapsed time for a strategy (last write wins).
    pub async fn upsert_timing(&self, strategy: &str, elapsed_secs: f64) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO times (method, time_taken, recorded_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (method) DO UPDATE SET
               time_taken = excluded.time_taken,
               recorded_at = excluded.recorded_at",
        )
        .bind(strategy)
        .bind(elapsed_secs)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_timing(&self, strategy: &str) -> Result<Option<TimingEntry>, StoreError> {
        let row = sqlx::query_as::<_, TimingEntry>(
            "SELECT method AS strategy, time_taken AS elapsed_secs, recorded_at
             FROM times WHERE method = ?1",
        )
        .bind(strategy)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// All timings ordered by strategy name.
    pub async fn get_timings(&self) -> Result<Vec<TimingEntry>, StoreError> {
        let rows = sqlx::query_as::<_, TimingEntry>(
            "SELECT method AS strategy, time_taken AS elapsed_secs, recorded_at
             FROM times ORDER BY method",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
