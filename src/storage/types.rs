use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another instance of the application has locked the database
    #[error("Another instance of mull appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        let error_string = err.to_string().to_lowercase();

        // SQLITE_BUSY (5): database is locked
        // SQLITE_LOCKED (6): database table is locked
        // SQLITE_CANTOPEN (14): unable to open database file
        if error_string.contains("database is locked")
            || error_string.contains("database table is locked")
            || error_string.contains("sqlite_busy")
            || error_string.contains("sqlite_locked")
            || error_string.contains("unable to open database file")
        {
            return DatabaseError::InstanceLocked;
        }

        DatabaseError::Other(err)
    }
}

// ============================================================================
// Articles
// ============================================================================

/// Where an article row came from. Seed rows ship with the binary and are
/// read-only; user rows are authored in the editor (or imported) and are the
/// only rows deletion ever touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleOrigin {
    Seed,
    User,
}

impl ArticleOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleOrigin::Seed => "seed",
            ArticleOrigin::User => "user",
        }
    }

    pub(crate) fn from_db(s: &str) -> Self {
        match s {
            "user" => ArticleOrigin::User,
            _ => ArticleOrigin::Seed,
        }
    }
}

/// One story in the merged working set.
///
/// All display fields are denormalized strings: the date and read-time are
/// stored exactly as they render (`23 August 2026`, `2 min read`), matching
/// the record shape the platform has always persisted. String fields use
/// `Arc<str>` for cheap cloning into views and suggestion lists.
#[derive(Debug, Clone)]
pub struct Article {
    pub id: Arc<str>,
    pub title: Arc<str>,
    pub author: Arc<str>,
    pub category: Arc<str>,
    pub excerpt: Arc<str>,
    /// Full body text; blank lines separate paragraphs.
    pub body: Arc<str>,
    pub published: Arc<str>,
    pub read_time: Arc<str>,
    pub trending: bool,
    /// Cover image: URL, `data:` URI, or whatever the author typed.
    pub image: Arc<str>,
    pub origin: ArticleOrigin,
}

impl Article {
    /// The id prefix every locally authored story carries. The profile
    /// view's delete gate keys on this, not on the typed origin column.
    pub const USER_ID_PREFIX: &'static str = "user-";

    pub fn has_user_id_prefix(&self) -> bool {
        self.id.starts_with(Self::USER_ID_PREFIX)
    }
}

/// Internal row type for article queries (sqlx FromRow).
/// Converts to [`Article`] via `into_article()` with Arc wrapping.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ArticleDbRow {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub excerpt: String,
    pub body: String,
    pub published: String,
    pub read_time: String,
    pub trending: bool,
    pub image: String,
    pub origin: String,
}

impl ArticleDbRow {
    pub(crate) fn into_article(self) -> Article {
        Article {
            id: Arc::from(self.id),
            title: Arc::from(self.title),
            author: Arc::from(self.author),
            category: Arc::from(self.category),
            excerpt: Arc::from(self.excerpt),
            body: Arc::from(self.body),
            published: Arc::from(self.published),
            read_time: Arc::from(self.read_time),
            trending: self.trending,
            image: Arc::from(self.image),
            origin: ArticleOrigin::from_db(&self.origin),
        }
    }
}

/// The article record shape of the platform's JSON: the embedded seed file
/// and legacy snapshot imports both use it. Field names are the platform's
/// own (`fullContent`, `readTime`, `isTrending`).
///
/// Every field defaults so a sparse or hand-edited record still parses; the
/// denylist pass drops rows without a title or author afterwards, the same
/// order of operations the platform applied to its stored blobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub full_content: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub read_time: String,
    #[serde(default)]
    pub is_trending: bool,
    #[serde(default)]
    pub image: String,
}

// ============================================================================
// Identity
// ============================================================================

/// The signed-in user. Stories publish under `name`; a missing identity
/// publishes under the shared "Guest Author" byline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    /// Byline used when no identity is stored.
    pub const GUEST_AUTHOR: &'static str = "Guest Author";
}

// ============================================================================
// Registries
// ============================================================================

/// One reading-history row: the article id plus when it was last viewed
/// (unix seconds), already in most-recent-first order when read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub article_id: String,
    pub viewed_at: i64,
}

// ============================================================================
// Snapshot import
// ============================================================================

/// Per-key counts from a legacy snapshot import. Keys that failed to parse
/// are listed in `skipped` and never abort the rest of the import.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub user_articles: usize,
    pub bookmarks: usize,
    pub followed_authors: usize,
    pub history: usize,
    pub downloads: usize,
    pub identity_set: bool,
    pub premium_users: usize,
    pub skipped: Vec<String>,
}

impl ImportReport {
    pub fn total_rows(&self) -> usize {
        self.user_articles + self.bookmarks + self.followed_authors + self.history + self.downloads
    }
}
