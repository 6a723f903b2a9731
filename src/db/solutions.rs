//! Solution record operations: insert-if-absent, atomic recognize, reset,
//! scan and count over the `solutions` table.

use super::Database;
use crate::error::StoreError;
use crate::recognition::{RecognitionOutcome, RegisterOutcome};
use crate::store::{RecognitionFilter, SolutionRecord};

/// Whitelisted WHERE clause for a filter. Never built from user input.
pub(crate) fn filter_predicate(filter: RecognitionFilter) -> &'static str {
    match filter {
        RecognitionFilter::All => "",
        RecognitionFilter::Recognized => " WHERE recognized = 1",
        RecognitionFilter::Unrecognized => " WHERE recognized = 0",
    }
}

impl Database {
    /// Insert an unrecognized record, ignoring the insert if the encoding is
    /// already present. The tagged result tells new from rediscovered.
    pub async fn insert_solution_ignore(
        &self,
        encoding: &str,
    ) -> Result<RegisterOutcome, StoreError> {
        let result = sqlx::query("INSERT OR IGNORE INTO solutions (solution) VALUES (?1)")
            .bind(encoding)
            .execute(&self.pool)
            .await?;
        Ok(if result.rows_affected() == 1 {
            RegisterOutcome::Inserted
        } else {
            RegisterOutcome::AlreadyPresent
        })
    }

    /// Credit `player` with `encoding` if nobody has yet.
    ///
    /// The conditional `UPDATE ... WHERE recognized = 0` is the
    /// check-and-write in one statement; the follow-up lookup that explains a
    /// refusal runs in the same transaction so it sees the same row.
    pub async fn mark_recognized(
        &self,
        encoding: &str,
        player: &str,
    ) -> Result<RecognitionOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query(
            "UPDATE solutions SET recognized = 1, recognized_by = ?1
             WHERE solution = ?2 AND recognized = 0",
        )
        .bind(player)
        .bind(encoding)
        .execute(&mut *tx)
        .await?;

        let outcome = if updated.rows_affected() == 1 {
            RecognitionOutcome::Recognized
        } else {
            let existing = sqlx::query_scalar::<_, Option<String>>(
                "SELECT recognized_by FROM solutions WHERE solution = ?1",
            )
            .bind(encoding)
            .fetch_optional(&mut *tx)
            .await?;
            match existing {
                None => RecognitionOutcome::NotFound,
                Some(by) => RecognitionOutcome::AlreadyRecognized { by },
            }
        };
        tx.commit().await?;
        Ok(outcome)
    }

    /// Clear every flag and attribution. Returns the number of rows.
    pub async fn reset_recognition(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE solutions SET recognized = 0, recognized_by = NULL")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// All records in insertion order.
    pub async fn get_solutions(&self) -> Result<Vec<SolutionRecord>, StoreError> {
        let rows = sqlx::query_as::<_, SolutionRecord>(
            "SELECT solution AS encoding, recognized_by, recognized
             FROM solutions ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_solution(&self, encoding: &str) -> Result<Option<SolutionRecord>, StoreError> {
        let row = sqlx::query_as::<_, SolutionRecord>(
            "SELECT solution AS encoding, recognized_by, recognized
             FROM solutions WHERE solution = ?1",
        )
        .bind(encoding)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn count_solutions(&self, filter: RecognitionFilter) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM solutions{}", filter_predicate(filter));
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
