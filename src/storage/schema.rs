use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;

use super::types::DatabaseError;

/// Current schema version, stamped into `PRAGMA user_version`.
///
/// Version 0 is an empty database. Anything newer than this constant was
/// written by a later build and is refused rather than guessed at.
const SCHEMA_VERSION: i64 = 1;

// ============================================================================
// Database
// ============================================================================

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

impl Database {
    /// Open a database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InstanceLocked` if another instance of mull
    /// has the database locked (SQLITE_BUSY, SQLITE_LOCKED, SQLITE_CANTOPEN).
    /// Returns `DatabaseError::Migration` if the schema version check or a
    /// migration step fails, and `DatabaseError::Other` for anything else.
    pub async fn open(path: &str) -> Result<Self, DatabaseError> {
        let url = format!("sqlite:{}?mode=rwc", path);

        // Set database file permissions before pool creation so there is no
        // window where the file exists with default umask permissions.
        #[cfg(unix)]
        if path != ":memory:" {
            use std::os::unix::fs::PermissionsExt;
            let db_path = std::path::Path::new(path);
            if db_path.exists() {
                let perms = std::fs::Permissions::from_mode(0o600);
                if let Err(e) = std::fs::set_permissions(path, perms) {
                    tracing::warn!(path = %path, error = %e, "Failed to set database file permissions");
                }
            } else if let Some(parent) = db_path.parent() {
                if parent.exists() {
                    // Pre-create the file with mode(0o600) so the permission
                    // is set at creation time, not chmod'd after.
                    use std::os::unix::fs::OpenOptionsExt;
                    let _file = std::fs::OpenOptions::new()
                        .write(true)
                        .create_new(true)
                        .mode(0o600)
                        .open(db_path)
                        .ok(); // If creation fails, SQLite reports it at connect_with.
                }
            }
        }

        // busy_timeout=5000: SQLite waits up to 5 seconds for locks to release
        // before returning SQLITE_BUSY. Using pragma() ensures all connections
        // in the pool inherit the setting.
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(DatabaseError::from_sqlx)?
            .pragma("busy_timeout", "5000");
        // SQLite is single-writer; all UI writes are awaited inline, so a
        // small pool is plenty.
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(DatabaseError::from_sqlx)?;
        let db = Self { pool };
        db.migrate().await.map_err(|e| {
            // Migration errors could also be lock-related
            let error_string = e.to_string().to_lowercase();
            if error_string.contains("database is locked")
                || error_string.contains("database table is locked")
                || error_string.contains("sqlite_busy")
                || error_string.contains("sqlite_locked")
            {
                DatabaseError::InstanceLocked
            } else {
                DatabaseError::Migration(e.to_string())
            }
        })?;
        Ok(db)
    }

    /// Run database migrations atomically within a transaction.
    ///
    /// The schema version lives in `PRAGMA user_version`. A fresh database
    /// (version 0) gets the full schema created and is stamped with
    /// [`SCHEMA_VERSION`]; a database from a newer build is refused. All
    /// changes happen inside one transaction, so a failure mid-migration
    /// leaves the previous consistent state intact.
    async fn migrate(&self) -> Result<()> {
        sqlx::query("PRAGMA busy_timeout = 5000")
            .execute(&self.pool)
            .await?;

        let mut tx = self.pool.begin().await?;

        let (version,): (i64,) = sqlx::query_as("PRAGMA user_version")
            .fetch_one(&mut *tx)
            .await?;

        if version > SCHEMA_VERSION {
            anyhow::bail!(
                "schema version {} is newer than this build supports (max {})",
                version,
                SCHEMA_VERSION
            );
        }

        if version < 1 {
            // Articles: seed rows and user-authored rows share one table,
            // distinguished by origin. Display fields are denormalized
            // strings, matching the platform's stored record shape.
            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS articles (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    author TEXT NOT NULL,
                    category TEXT NOT NULL,
                    excerpt TEXT NOT NULL DEFAULT '',
                    body TEXT NOT NULL DEFAULT '',
                    published TEXT NOT NULL DEFAULT '',
                    read_time TEXT NOT NULL DEFAULT '',
                    trending INTEGER NOT NULL DEFAULT 0,
                    image TEXT NOT NULL DEFAULT '',
                    origin TEXT NOT NULL CHECK (origin IN ('seed', 'user')),
                    seed_rank INTEGER,
                    created_at TEXT NOT NULL DEFAULT (datetime('now'))
                )
            "#,
            )
            .execute(&mut *tx)
            .await?;

            sqlx::query("CREATE INDEX IF NOT EXISTS idx_articles_origin ON articles(origin)")
                .execute(&mut *tx)
                .await?;
            sqlx::query("CREATE INDEX IF NOT EXISTS idx_articles_author ON articles(author)")
                .execute(&mut *tx)
                .await?;

            // Registries store membership plus an append position. There are
            // deliberately no foreign keys into articles: a saved or
            // downloaded id may outlive its article, and views simply skip
            // ids that no longer resolve.
            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS bookmarks (
                    article_id TEXT PRIMARY KEY,
                    position INTEGER NOT NULL
                )
            "#,
            )
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS followed_authors (
                    author TEXT PRIMARY KEY,
                    position INTEGER NOT NULL
                )
            "#,
            )
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS downloads (
                    article_id TEXT PRIMARY KEY,
                    position INTEGER NOT NULL
                )
            "#,
            )
            .execute(&mut *tx)
            .await?;

            // Reading history: one row per article, most-recent-first by seq.
            // The 50-entry cap is enforced on insert, not by the schema.
            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS read_history (
                    article_id TEXT PRIMARY KEY,
                    seq INTEGER NOT NULL,
                    viewed_at INTEGER NOT NULL
                )
            "#,
            )
            .execute(&mut *tx)
            .await?;

            sqlx::query("CREATE INDEX IF NOT EXISTS idx_read_history_seq ON read_history(seq DESC)")
                .execute(&mut *tx)
                .await?;

            // Key-value store for user settings.
            // Keys use dotted convention: identity.name, premium.<username>, etc.
            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS user_preferences (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
                )
            "#,
            )
            .execute(&mut *tx)
            .await?;
        }

        // PRAGMA does not accept bind parameters; SCHEMA_VERSION is a const.
        sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_stamps_schema_version() {
        let db = Database::open(":memory:").await.unwrap();
        let (version,): (i64,) = sqlx::query_as("PRAGMA user_version")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = Database::open(":memory:").await.unwrap();
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_newer_schema_version_is_refused() {
        let db = Database::open(":memory:").await.unwrap();
        sqlx::query("PRAGMA user_version = 99")
            .execute(&db.pool)
            .await
            .unwrap();

        let err = db.migrate().await.unwrap_err();
        assert!(err.to_string().contains("newer than this build"));
    }
}
