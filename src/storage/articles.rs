use anyhow::Result;

use super::schema::Database;
use super::types::{Article, ArticleDbRow, ArticleRecord};

/// Columns selected by every article query, in [`ArticleDbRow`] order.
const ARTICLE_COLUMNS: &str =
    "id, title, author, category, excerpt, body, published, read_time, trending, image, origin";

/// Returns true if a locally authored story matches the platform's takedown
/// list and must be dropped from the working set.
///
/// The list removes rows with a blank title or author, plus two specific
/// spam signatures published under the shared "Guest Author" byline. Title
/// matching is case-insensitive on the trimmed title; author matching trims
/// but keeps case.
pub fn is_denylisted(title: &str, author: &str) -> bool {
    if title.is_empty() || author.is_empty() {
        return true;
    }

    let title_key = title.trim().to_lowercase();
    let author_key = author.trim();

    if author_key == "Guest Author"
        && (title_key == "impression" || title_key.contains("this is ultra cool"))
    {
        return true;
    }

    false
}

impl Database {
    // ========================================================================
    // Seed Articles
    // ========================================================================

    /// Upsert the shipped seed catalog, preserving its order via `seed_rank`.
    ///
    /// Seed rows are refreshed on every run so a newer build's copy edits
    /// take effect, but a row's id never changes, so bookmarks and history
    /// pointing at seeds stay valid. Returns the number of rows that were
    /// new to this database.
    pub async fn sync_seed_articles(&self, records: &[ArticleRecord]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        let (before,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM articles WHERE origin = 'seed'")
                .fetch_one(&mut *tx)
                .await?;

        for (rank, record) in records.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO articles
                    (id, title, author, category, excerpt, body, published,
                     read_time, trending, image, origin, seed_rank)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'seed', ?)
                ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    author = excluded.author,
                    category = excluded.category,
                    excerpt = excluded.excerpt,
                    body = excluded.body,
                    published = excluded.published,
                    read_time = excluded.read_time,
                    trending = excluded.trending,
                    image = excluded.image,
                    seed_rank = excluded.seed_rank
            "#,
            )
            .bind(&record.id)
            .bind(&record.title)
            .bind(&record.author)
            .bind(&record.category)
            .bind(&record.excerpt)
            .bind(&record.full_content)
            .bind(&record.date)
            .bind(&record.read_time)
            .bind(record.is_trending)
            .bind(&record.image)
            .bind(rank as i64)
            .execute(&mut *tx)
            .await?;
        }

        let (after,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM articles WHERE origin = 'seed'")
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok((after - before).max(0) as usize)
    }

    // ========================================================================
    // Working Set
    // ========================================================================

    /// Load the merged working set: locally authored stories newest-first,
    /// then the seed catalog in shipped order.
    pub async fn load_articles(&self) -> Result<Vec<Article>> {
        let user_rows = sqlx::query_as::<_, ArticleDbRow>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE origin = 'user' ORDER BY rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let seed_rows = sqlx::query_as::<_, ArticleDbRow>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE origin = 'seed' ORDER BY seed_rank"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(user_rows
            .into_iter()
            .chain(seed_rows)
            .map(ArticleDbRow::into_article)
            .collect())
    }

    /// Remove locally authored stories that match the takedown list.
    ///
    /// Runs before every working-set load. Only user rows are candidates;
    /// the seed catalog is never touched. Returns how many rows were
    /// removed so the caller can log the cleanup, which stays silent when
    /// nothing matched.
    pub async fn apply_denylist(&self) -> Result<usize> {
        let rows: Vec<(String, String, String)> =
            sqlx::query_as("SELECT id, title, author FROM articles WHERE origin = 'user'")
                .fetch_all(&self.pool)
                .await?;

        let condemned: Vec<String> = rows
            .into_iter()
            .filter(|(_, title, author)| is_denylisted(title, author))
            .map(|(id, _, _)| id)
            .collect();

        if condemned.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        for id in &condemned {
            sqlx::query("DELETE FROM articles WHERE id = ? AND origin = 'user'")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(condemned.len())
    }

    // ========================================================================
    // Publishing
    // ========================================================================

    /// Insert a locally authored story. The caller builds the full article,
    /// including its `user-` prefixed id and denormalized display fields.
    pub async fn insert_user_article(&self, article: &Article) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO articles
                (id, title, author, category, excerpt, body, published,
                 read_time, trending, image, origin)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'user')
        "#,
        )
        .bind(&*article.id)
        .bind(&*article.title)
        .bind(&*article.author)
        .bind(&*article.category)
        .bind(&*article.excerpt)
        .bind(&*article.body)
        .bind(&*article.published)
        .bind(&*article.read_time)
        .bind(article.trending)
        .bind(&*article.image)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete a locally authored story, returning whether a row was removed.
    ///
    /// The `origin = 'user'` guard makes seed rows structurally undeletable:
    /// a delete aimed at a seed id affects nothing and returns false, which
    /// matches how the platform's delete only ever rewrote the user list.
    pub async fn delete_user_article(&self, article_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ? AND origin = 'user'")
            .bind(article_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
