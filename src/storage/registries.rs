use anyhow::Result;

use super::schema::Database;

// Registry table names are compile-time constants, never user input, so
// interpolating them into SQL is safe.
pub(super) const BOOKMARKS: (&str, &str) = ("bookmarks", "article_id");
pub(super) const FOLLOWED_AUTHORS: (&str, &str) = ("followed_authors", "author");
pub(super) const DOWNLOADS: (&str, &str) = ("downloads", "article_id");

/// Append a key at the end of a registry unless it is already a member.
/// Returns whether a row was inserted. Shared by the interactive toggle
/// and the snapshot importer, which runs inside its own transaction.
pub(super) async fn insert_registry_key(
    conn: &mut sqlx::SqliteConnection,
    (table, key_column): (&str, &str),
    key: &str,
) -> Result<bool> {
    // Aggregate over an empty table still yields one row, so the first key
    // lands at position 0.
    let result = sqlx::query(&format!(
        "INSERT OR IGNORE INTO {table} ({key_column}, position) \
         SELECT ?, COALESCE(MAX(position), -1) + 1 FROM {table}"
    ))
    .bind(key)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

impl Database {
    // ========================================================================
    // Membership Registries
    // ========================================================================
    //
    // Bookmarks, followed authors, and offline downloads share one shape:
    // an ordered set of keys with toggle semantics. Removing and re-adding
    // a key appends it at the end, so the stored order is the order of the
    // most recent additions.

    async fn toggle_registry(&self, (table, key_column): (&str, &str), key: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(i64,)> =
            sqlx::query_as(&format!("SELECT position FROM {table} WHERE {key_column} = ?"))
                .bind(key)
                .fetch_optional(&mut *tx)
                .await?;

        let added = match existing {
            Some(_) => {
                sqlx::query(&format!("DELETE FROM {table} WHERE {key_column} = ?"))
                    .bind(key)
                    .execute(&mut *tx)
                    .await?;
                false
            }
            None => {
                insert_registry_key(&mut *tx, (table, key_column), key).await?;
                true
            }
        };

        tx.commit().await?;
        Ok(added)
    }

    async fn registry_keys(&self, (table, key_column): (&str, &str)) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as(&format!("SELECT {key_column} FROM {table} ORDER BY position"))
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(k,)| k).collect())
    }

    // ========================================================================
    // Bookmarks
    // ========================================================================

    /// Toggle an article's bookmark, returning true if it is now saved.
    pub async fn toggle_bookmark(&self, article_id: &str) -> Result<bool> {
        self.toggle_registry(BOOKMARKS, article_id).await
    }

    /// Saved article ids in registry order.
    pub async fn bookmarked_ids(&self) -> Result<Vec<String>> {
        self.registry_keys(BOOKMARKS).await
    }

    // ========================================================================
    // Followed Authors
    // ========================================================================

    /// Toggle a follow, returning true if the author is now followed.
    pub async fn toggle_followed_author(&self, author: &str) -> Result<bool> {
        self.toggle_registry(FOLLOWED_AUTHORS, author).await
    }

    /// Followed author names in registry order.
    pub async fn followed_authors(&self) -> Result<Vec<String>> {
        self.registry_keys(FOLLOWED_AUTHORS).await
    }

    // ========================================================================
    // Offline Downloads
    // ========================================================================

    /// Toggle an article's download, returning true if it is now downloaded.
    pub async fn toggle_download(&self, article_id: &str) -> Result<bool> {
        self.toggle_registry(DOWNLOADS, article_id).await
    }

    /// Downloaded article ids in registry order.
    pub async fn downloaded_ids(&self) -> Result<Vec<String>> {
        self.registry_keys(DOWNLOADS).await
    }
}
