//! Shipped seed catalog.
//!
//! Fourteen editorial articles ship embedded in the binary and are synced
//! into the database on every start. A `seed_path` in the config file
//! swaps in an external catalog, which is useful for demo datasets; if
//! that file is missing or malformed the embedded catalog is used instead
//! so startup never fails over a bad override.

use std::path::Path;

use anyhow::{Context, Result};

use crate::storage::ArticleRecord;

const EMBEDDED_SEED: &str = include_str!("../data/seed_articles.json");

/// Parse and sanity-filter a seed catalog. Records without an id, title,
/// or author are dropped with a warning rather than synced as broken rows.
fn parse_catalog(raw: &str) -> Result<Vec<ArticleRecord>> {
    let records: Vec<ArticleRecord> =
        serde_json::from_str(raw).context("seed catalog is not a JSON array of articles")?;

    let total = records.len();
    let records: Vec<ArticleRecord> = records
        .into_iter()
        .filter(|r| !r.id.is_empty() && !r.title.is_empty() && !r.author.is_empty())
        .collect();

    if records.len() < total {
        tracing::warn!(
            dropped = total - records.len(),
            "Dropped incomplete records from seed catalog"
        );
    }

    Ok(records)
}

/// The catalog compiled into the binary.
pub fn embedded_seed_records() -> Result<Vec<ArticleRecord>> {
    parse_catalog(EMBEDDED_SEED)
}

/// Load the seed catalog, preferring `override_path` when it is set and
/// readable, otherwise falling back to the embedded catalog.
pub fn load_seed_records(override_path: Option<&Path>) -> Result<Vec<ArticleRecord>> {
    if let Some(path) = override_path {
        match std::fs::read_to_string(path) {
            Ok(raw) => match parse_catalog(&raw) {
                Ok(records) => {
                    tracing::info!(path = %path.display(), count = records.len(), "Loaded seed catalog override");
                    return Ok(records);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Seed override failed to parse, using embedded catalog");
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Seed override unreadable, using embedded catalog");
            }
        }
    }

    embedded_seed_records()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_parses() {
        let records = embedded_seed_records().unwrap();
        assert_eq!(records.len(), 14);
        assert!(records.iter().all(|r| r.id.starts_with("seed-")));
    }

    #[test]
    fn test_embedded_catalog_has_trending_entries() {
        let records = embedded_seed_records().unwrap();
        let trending = records.iter().filter(|r| r.is_trending).count();
        assert!(trending >= 2, "the Trending tab needs at least two entries");
    }

    #[test]
    fn test_embedded_catalog_field_shapes() {
        for record in embedded_seed_records().unwrap() {
            assert!(!record.category.is_empty(), "{} has no category", record.id);
            assert!(!record.full_content.is_empty(), "{} has no body", record.id);
            assert!(record.read_time.ends_with("min read"), "{}", record.id);
        }
    }

    #[test]
    fn test_parse_catalog_drops_incomplete_records() {
        let raw = r#"[
            {"id": "seed-1", "title": "Kept", "author": "A", "category": "Culture"},
            {"id": "", "title": "No Id", "author": "A"},
            {"id": "seed-3", "title": "", "author": "A"}
        ]"#;
        let records = parse_catalog(raw).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "seed-1");
    }

    #[test]
    fn test_missing_override_falls_back_to_embedded() {
        let records =
            load_seed_records(Some(Path::new("/nonexistent/seed.json"))).unwrap();
        assert_eq!(records.len(), 14);
    }
}
