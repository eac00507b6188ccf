use anyhow::Result;

use super::schema::Database;
use super::types::HistoryEntry;

/// Reading history keeps at most this many entries; the oldest fall off.
pub const HISTORY_CAP: usize = 50;

impl Database {
    // ========================================================================
    // Reading History Operations
    // ========================================================================

    /// Record that an article was opened for reading.
    ///
    /// History is a most-recent-first list with no duplicates: re-reading an
    /// article moves its entry to the front rather than adding a second row.
    /// After the insert the list is trimmed to [`HISTORY_CAP`] entries. The
    /// whole operation is one transaction, so the cap can never be observed
    /// as exceeded.
    pub async fn record_view(&self, article_id: &str) -> Result<()> {
        let viewed_at = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO read_history (article_id, seq, viewed_at)
            VALUES (?, (SELECT COALESCE(MAX(seq), 0) + 1 FROM read_history), ?)
            ON CONFLICT(article_id) DO UPDATE SET
                seq = excluded.seq,
                viewed_at = excluded.viewed_at
        "#,
        )
        .bind(article_id)
        .bind(viewed_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM read_history
            WHERE article_id NOT IN (
                SELECT article_id FROM read_history ORDER BY seq DESC LIMIT ?
            )
        "#,
        )
        .bind(HISTORY_CAP as i64)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Remove a single history entry. Unknown ids are a no-op.
    pub async fn remove_history_entry(&self, article_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM read_history WHERE article_id = ?")
            .bind(article_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Drop the whole reading history.
    pub async fn clear_history(&self) -> Result<()> {
        sqlx::query("DELETE FROM read_history")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Reading history, most recent first.
    pub async fn get_history(&self) -> Result<Vec<HistoryEntry>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT article_id, viewed_at FROM read_history ORDER BY seq DESC LIMIT ?",
        )
        .bind(HISTORY_CAP as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(article_id, viewed_at)| HistoryEntry {
                article_id,
                viewed_at,
            })
            .collect())
    }
}
