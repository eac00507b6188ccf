//! Legacy snapshot import.
//!
//! The platform's previous client kept everything in browser storage under
//! `thoughts_*` keys. A snapshot of that storage is a JSON object mapping
//! key names to values, where each value is either native JSON or, in dumps
//! taken straight from the browser, a string that itself contains JSON.
//! The importer accepts both encodings and is fail-soft per key: a value
//! that will not parse is reported as skipped while the rest import.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::preferences::{upsert_preference, PREF_IDENTITY_EMAIL, PREF_IDENTITY_NAME};
use super::reading_history::HISTORY_CAP;
use super::registries::{insert_registry_key, BOOKMARKS, DOWNLOADS, FOLLOWED_AUTHORS};
use super::schema::Database;
use super::types::{ArticleRecord, ImportReport};

const KEY_USER_ARTICLES: &str = "thoughts_user_articles";
const KEY_SAVED: &str = "thoughts_saved_articles";
const KEY_FOLLOWS: &str = "thoughts_followed_authors";
const KEY_HISTORY: &str = "thoughts_read_history";
const KEY_DOWNLOADS: &str = "thoughts_downloaded_articles";
const KEY_USER_NAME: &str = "thoughts_user_name";
const KEY_USER_EMAIL: &str = "thoughts_user_email";
const KEY_PREMIUM_PREFIX: &str = "thoughts_premium_";

/// Decode a snapshot value that may be doubly encoded.
///
/// Browser storage holds strings, so a raw dump wraps every list in a JSON
/// string. Try the value as-is first; if it is a string and the direct read
/// failed, parse the string's content instead. A plain `String` target
/// succeeds on the first attempt and keeps the raw value, which is what the
/// name and email keys need.
fn decode<T: DeserializeOwned>(value: &Value) -> Option<T> {
    if let Ok(parsed) = serde_json::from_value::<T>(value.clone()) {
        return Some(parsed);
    }
    if let Value::String(inner) = value {
        return serde_json::from_str::<T>(inner).ok();
    }
    None
}

impl Database {
    /// Import a legacy storage snapshot, merging into the current database.
    ///
    /// Everything lands in one transaction, so a database failure midway
    /// leaves no partial import. Existing rows always win on collision:
    /// imported articles, registry keys, and history entries that already
    /// exist are left untouched.
    pub async fn import_snapshot(&self, raw: &str) -> Result<ImportReport> {
        let snapshot: serde_json::Map<String, Value> =
            serde_json::from_str(raw).context("snapshot is not a JSON object")?;

        let mut report = ImportReport::default();
        let mut tx = self.pool.begin().await?;

        for (key, value) in &snapshot {
            match key.as_str() {
                KEY_USER_ARTICLES => match decode::<Vec<ArticleRecord>>(value) {
                    Some(records) => {
                        // Snapshot arrays are newest-first; inserting in
                        // reverse keeps that order under the newest-first
                        // (rowid DESC) working-set read.
                        for record in records.iter().rev() {
                            let result = sqlx::query(
                                r#"
                                INSERT OR IGNORE INTO articles
                                    (id, title, author, category, excerpt, body, published,
                                     read_time, trending, image, origin)
                                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'user')
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
                            .execute(&mut *tx)
                            .await?;
                            report.user_articles += result.rows_affected() as usize;
                        }
                    }
                    None => report.skipped.push(key.clone()),
                },
                KEY_SAVED => match decode::<Vec<String>>(value) {
                    Some(ids) => {
                        for id in &ids {
                            if insert_registry_key(&mut *tx, BOOKMARKS, id).await? {
                                report.bookmarks += 1;
                            }
                        }
                    }
                    None => report.skipped.push(key.clone()),
                },
                KEY_FOLLOWS => match decode::<Vec<String>>(value) {
                    Some(authors) => {
                        for author in &authors {
                            if insert_registry_key(&mut *tx, FOLLOWED_AUTHORS, author).await? {
                                report.followed_authors += 1;
                            }
                        }
                    }
                    None => report.skipped.push(key.clone()),
                },
                KEY_DOWNLOADS => match decode::<Vec<String>>(value) {
                    Some(ids) => {
                        for id in &ids {
                            if insert_registry_key(&mut *tx, DOWNLOADS, id).await? {
                                report.downloads += 1;
                            }
                        }
                    }
                    None => report.skipped.push(key.clone()),
                },
                KEY_HISTORY => match decode::<Vec<String>>(value) {
                    Some(ids) => {
                        let viewed_at = chrono::Utc::now().timestamp();
                        // Newest-first in the snapshot; reverse-insert with
                        // ascending seq so the newest ends up on top.
                        for id in ids.iter().take(HISTORY_CAP).rev() {
                            let result = sqlx::query(
                                r#"
                                INSERT OR IGNORE INTO read_history (article_id, seq, viewed_at)
                                VALUES (?, (SELECT COALESCE(MAX(seq), 0) + 1 FROM read_history), ?)
                            "#,
                            )
                            .bind(id)
                            .bind(viewed_at)
                            .execute(&mut *tx)
                            .await?;
                            report.history += result.rows_affected() as usize;
                        }
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
                    }
                    None => report.skipped.push(key.clone()),
                },
                KEY_USER_NAME => match decode::<String>(value) {
                    Some(name) if !name.is_empty() => {
                        upsert_preference(&mut *tx, PREF_IDENTITY_NAME, &name).await?;
                        report.identity_set = true;
                    }
                    Some(_) => {}
                    None => report.skipped.push(key.clone()),
                },
                KEY_USER_EMAIL => match decode::<String>(value) {
                    Some(email) => {
                        upsert_preference(&mut *tx, PREF_IDENTITY_EMAIL, &email).await?;
                    }
                    None => report.skipped.push(key.clone()),
                },
                premium if premium.starts_with(KEY_PREMIUM_PREFIX) => {
                    let username = &premium[KEY_PREMIUM_PREFIX.len()..];
                    // The platform granted premium only on the literal
                    // string "true"; anything else is ignored.
                    match decode::<String>(value) {
                        Some(flag) if flag == "true" && !username.is_empty() => {
                            let pref_key =
                                format!("{}{}", super::preferences::PREMIUM_PREFIX, username);
                            upsert_preference(&mut *tx, &pref_key, "true").await?;
                            report.premium_users += 1;
                        }
                        _ => {}
                    }
                }
                other => {
                    tracing::debug!(key = %other, "Ignoring unrecognized snapshot key");
                }
            }
        }

        tx.commit().await?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_import_doubly_encoded_snapshot() {
        let db = test_db().await;
        // Values as a raw browser dump stores them: JSON inside strings.
        let raw = r#"{
            "thoughts_saved_articles": "[\"seed-1\", \"seed-2\"]",
            "thoughts_followed_authors": "[\"Ada Lovelace\"]",
            "thoughts_user_name": "Ada Lovelace",
            "thoughts_user_email": "ada@example.com",
            "thoughts_premium_Ada Lovelace": "true"
        }"#;

        let report = db.import_snapshot(raw).await.unwrap();
        assert_eq!(report.bookmarks, 2);
        assert_eq!(report.followed_authors, 1);
        assert!(report.identity_set);
        assert_eq!(report.premium_users, 1);
        assert!(report.skipped.is_empty());

        assert_eq!(db.bookmarked_ids().await.unwrap(), vec!["seed-1", "seed-2"]);
        let identity = db.load_identity().await.unwrap().unwrap();
        assert_eq!(identity.name, "Ada Lovelace");
        assert!(db.is_premium("Ada Lovelace").await.unwrap());
    }

    #[tokio::test]
    async fn test_import_native_json_snapshot() {
        let db = test_db().await;
        let raw = r#"{
            "thoughts_downloaded_articles": ["seed-3"],
            "thoughts_read_history": ["seed-2", "seed-1"]
        }"#;

        let report = db.import_snapshot(raw).await.unwrap();
        assert_eq!(report.downloads, 1);
        assert_eq!(report.history, 2);

        let history = db.get_history().await.unwrap();
        let ids: Vec<&str> = history.iter().map(|e| e.article_id.as_str()).collect();
        assert_eq!(ids, vec!["seed-2", "seed-1"]);
    }

    #[tokio::test]
    async fn test_import_user_articles_keep_snapshot_order() {
        let db = test_db().await;
        let raw = r#"{
            "thoughts_user_articles": [
                {"id": "user-2", "title": "Newest", "author": "Ada", "category": "Culture"},
                {"id": "user-1", "title": "Oldest", "author": "Ada", "category": "Culture"}
            ]
        }"#;

        let report = db.import_snapshot(raw).await.unwrap();
        assert_eq!(report.user_articles, 2);

        let articles = db.load_articles().await.unwrap();
        let ids: Vec<&str> = articles.iter().map(|a| &*a.id).collect();
        assert_eq!(ids, vec!["user-2", "user-1"]);
    }

    #[tokio::test]
    async fn test_import_is_fail_soft_per_key() {
        let db = test_db().await;
        let raw = r#"{
            "thoughts_saved_articles": "not json at all",
            "thoughts_followed_authors": ["Grace Hopper"]
        }"#;

        let report = db.import_snapshot(raw).await.unwrap();
        assert_eq!(report.skipped, vec!["thoughts_saved_articles"]);
        assert_eq!(report.followed_authors, 1);
        assert!(db.bookmarked_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_top_level_garbage_is_an_error() {
        let db = test_db().await;
        assert!(db.import_snapshot("[1, 2, 3]").await.is_err());
        assert!(db.import_snapshot("not json").await.is_err());
    }

    #[tokio::test]
    async fn test_import_existing_rows_win() {
        let db = test_db().await;
        db.toggle_bookmark("seed-1").await.unwrap();

        let report = db
            .import_snapshot(r#"{"thoughts_saved_articles": ["seed-1", "seed-9"]}"#)
            .await
            .unwrap();
        assert_eq!(report.bookmarks, 1);
        assert_eq!(db.bookmarked_ids().await.unwrap(), vec!["seed-1", "seed-9"]);
    }

    #[tokio::test]
    async fn test_import_history_respects_cap() {
        let db = test_db().await;
        let ids: Vec<String> = (0..70).map(|i| format!("\"seed-{}\"", i)).collect();
        let raw = format!(r#"{{"thoughts_read_history": [{}]}}"#, ids.join(", "));

        let report = db.import_snapshot(&raw).await.unwrap();
        assert_eq!(report.history, 50);

        let history = db.get_history().await.unwrap();
        assert_eq!(history.len(), 50);
        assert_eq!(history[0].article_id, "seed-0");
    }

    #[tokio::test]
    async fn test_import_premium_requires_literal_true() {
        let db = test_db().await;
        let raw = r#"{
            "thoughts_premium_Ada": "true",
            "thoughts_premium_Grace": "yes",
            "thoughts_premium_Linus": "false"
        }"#;

        let report = db.import_snapshot(raw).await.unwrap();
        assert_eq!(report.premium_users, 1);
        assert!(db.is_premium("Ada").await.unwrap());
        assert!(!db.is_premium("Grace").await.unwrap());
    }
}
