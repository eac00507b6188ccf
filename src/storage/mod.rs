mod articles;
mod import;
mod preferences;
mod reading_history;
mod registries;
mod schema;
mod types;

pub use articles::is_denylisted;
pub use reading_history::HISTORY_CAP;
pub use schema::Database;
pub use types::{
    Article, ArticleOrigin, ArticleRecord, DatabaseError, HistoryEntry, Identity, ImportReport,
};
