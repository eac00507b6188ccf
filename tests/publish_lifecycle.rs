//! Integration tests for the publishing lifecycle: seed sync, local
//! publishing, deletion, the takedown sweep, and snapshot import.
//!
//! Each test creates its own in-memory SQLite database for isolation and
//! exercises the storage layer together with the application state, the way
//! the binary composes them.

use mull::app::{App, DeleteOrigin, EditorField};
use mull::config::Config;
use mull::storage::{ArticleRecord, Database, Identity};

async fn test_db() -> Database {
    Database::open(":memory:").await.unwrap()
}

fn seed_record(id: &str, title: &str, author: &str, category: &str) -> ArticleRecord {
    ArticleRecord {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        category: category.to_string(),
        excerpt: format!("{} excerpt...", title),
        full_content: format!("{} body text.", title),
        date: "1 January 2026".to_string(),
        read_time: "1 min read".to_string(),
        is_trending: false,
        image: String::new(),
    }
}

async fn seeded_app() -> App {
    let db = test_db().await;
    db.sync_seed_articles(&[
        seed_record("seed-1", "Slow Mornings", "Ada Lovelace", "Culture"),
        seed_record("seed-2", "Night Trains", "Grace Hopper", "Travel"),
    ])
    .await
    .unwrap();

    let mut app = App::new(db, Config::default());
    app.load_all().await.unwrap();
    app
}

fn sign_in(app: &mut App, name: &str) {
    app.identity = Some(Identity {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
    });
}

// ============================================================================
// Publishing
// ============================================================================

#[tokio::test]
async fn test_published_story_leads_the_working_set() {
    let mut app = seeded_app().await;
    sign_in(&mut app, "Maya");

    app.open_editor();
    {
        let editor = app.editor.as_mut().unwrap();
        editor.title = "My First Story".to_string();
        editor.body = "Some words about things.".to_string();
    }
    app.publish_story().await.unwrap();

    assert_eq!(app.articles.len(), 3);
    let story = &app.articles[0];
    assert!(story.has_user_id_prefix());
    assert_eq!(&*story.title, "My First Story");
    assert_eq!(&*story.author, "Maya");
    assert!(story.excerpt.ends_with("..."));
    assert!(app.editor.is_none());

    // Survives a full reload from the database.
    app.load_all().await.unwrap();
    assert_eq!(app.articles.len(), 3);
    assert_eq!(&*app.articles[0].title, "My First Story");
}

#[tokio::test]
async fn test_read_time_derived_at_two_hundred_wpm() {
    let mut app = seeded_app().await;
    sign_in(&mut app, "Maya");

    app.open_editor();
    {
        let editor = app.editor.as_mut().unwrap();
        editor.title = "Long Read".to_string();
        editor.body = "word ".repeat(400);
    }
    app.publish_story().await.unwrap();

    assert_eq!(&*app.articles[0].read_time, "2 min read");
}

#[tokio::test]
async fn test_publishing_signed_out_uses_guest_byline() {
    let mut app = seeded_app().await;

    app.open_editor();
    {
        let editor = app.editor.as_mut().unwrap();
        editor.title = "Anonymous Thoughts".to_string();
        editor.body = "Written without signing in.".to_string();
    }
    app.publish_story().await.unwrap();

    assert_eq!(&*app.articles[0].author, Identity::GUEST_AUTHOR);
}

#[tokio::test]
async fn test_publish_without_title_or_body_is_refused() {
    let mut app = seeded_app().await;
    sign_in(&mut app, "Maya");

    app.open_editor();
    app.editor.as_mut().unwrap().body = "Body but no title.".to_string();
    app.publish_story().await.unwrap();

    // Editor stays open, nothing was stored.
    assert!(app.editor.is_some());
    assert_eq!(app.articles.len(), 2);
    assert!(app.status_message.is_some());
    assert_eq!(app.editor.as_ref().unwrap().focus, EditorField::Title);
}

#[tokio::test]
async fn test_placeholder_cover_generated_when_none_set() {
    let mut app = seeded_app().await;
    sign_in(&mut app, "Maya");

    app.open_editor();
    {
        let editor = app.editor.as_mut().unwrap();
        editor.title = "Coverless".to_string();
        editor.body = "No image attached.".to_string();
    }
    app.publish_story().await.unwrap();

    assert!(app.articles[0].image.starts_with("https://picsum.photos/seed/"));
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn test_delete_removes_story_and_leaves_registries_dangling() {
    let mut app = seeded_app().await;
    sign_in(&mut app, "Maya");

    app.open_editor();
    {
        let editor = app.editor.as_mut().unwrap();
        editor.title = "Ephemeral".to_string();
        editor.body = "Soon gone.".to_string();
    }
    app.publish_story().await.unwrap();
    let id = app.articles[0].id.to_string();

    app.toggle_bookmark(&id).await.unwrap();
    app.db.record_view(&id).await.unwrap();
    app.history = app.db.get_history().await.unwrap();

    app.delete_story(&id, DeleteOrigin::Profile).await.unwrap();

    assert_eq!(app.articles.len(), 2);
    // Registry rows are left in place; the views resolve and skip them.
    assert!(app.bookmarks.contains(&id));
    assert!(app.saved_articles().is_empty());
    assert!(app.history_articles().is_empty());
}

#[tokio::test]
async fn test_delete_aimed_at_seed_story_changes_nothing() {
    let mut app = seeded_app().await;
    app.delete_story("seed-1", DeleteOrigin::Profile)
        .await
        .unwrap();
    assert_eq!(app.articles.len(), 2);
}

#[tokio::test]
async fn test_reader_delete_closes_reader_even_when_noop() {
    let mut app = seeded_app().await;
    sign_in(&mut app, "Ada Lovelace");
    app.open_article("seed-1").await.unwrap();

    // The reader gate lets a signed-in author aim a delete at their own
    // seed story; the delete is a silent no-op but the reader still closes.
    assert!(app.reader_delete_allowed(&app.articles[0].clone()));
    app.delete_story("seed-1", DeleteOrigin::Reader)
        .await
        .unwrap();

    assert_eq!(app.articles.len(), 2);
    assert!(app.reader_article.is_none());
}

// ============================================================================
// Takedown sweep
// ============================================================================

#[tokio::test]
async fn test_startup_sweep_removes_spam_signatures() {
    let mut app = seeded_app().await;

    app.open_editor();
    {
        let editor = app.editor.as_mut().unwrap();
        editor.title = "Impression".to_string();
        editor.body = "spam body".to_string();
    }
    app.publish_story().await.unwrap();
    assert_eq!(app.articles.len(), 3);

    // What main() does on the next launch.
    let removed = app.db.apply_denylist().await.unwrap();
    assert_eq!(removed, 1);
    app.load_all().await.unwrap();
    assert_eq!(app.articles.len(), 2);
}

// ============================================================================
// Snapshot import
// ============================================================================

#[tokio::test]
async fn test_imported_snapshot_shows_up_in_session() {
    let db = test_db().await;
    db.sync_seed_articles(&[seed_record(
        "seed-1",
        "Slow Mornings",
        "Ada Lovelace",
        "Culture",
    )])
    .await
    .unwrap();

    // Values arrive as JSON-encoded strings, the way the platform's
    // localStorage serialized them.
    let snapshot = r#"{
        "thoughts_user_articles": "[{\"id\": \"user-1700000000001\", \"title\": \"Imported Story\", \"author\": \"Maya\", \"category\": \"Culture\", \"excerpt\": \"...\", \"fullContent\": \"Carried over.\", \"date\": \"2 May 2025\", \"readTime\": \"1 min read\", \"isTrending\": false, \"image\": \"\"}]",
        "thoughts_saved_articles": "[\"seed-1\"]",
        "thoughts_followed_authors": "[\"Ada Lovelace\"]",
        "thoughts_read_history": "[\"seed-1\"]",
        "thoughts_user_name": "Maya",
        "thoughts_user_email": "maya@example.com",
        "thoughts_premium_Maya": "true"
    }"#;
    let report = db.import_snapshot(snapshot).await.unwrap();
    assert_eq!(report.user_articles, 1);
    assert_eq!(report.bookmarks, 1);
    assert!(report.identity_set);
    assert!(report.skipped.is_empty());

    let mut app = App::new(db, Config::default());
    app.load_all().await.unwrap();

    assert_eq!(&*app.articles[0].title, "Imported Story");
    assert_eq!(app.saved_articles().len(), 1);
    assert!(app.is_following("Ada Lovelace"));
    assert_eq!(app.display_name(), "Maya");
    assert!(app.premium);
}

#[tokio::test]
async fn test_import_is_fail_soft_per_key() {
    let db = test_db().await;
    let snapshot = r#"{
        "thoughts_saved_articles": "{broken",
        "thoughts_followed_authors": "[\"Grace Hopper\"]"
    }"#;

    let report = db.import_snapshot(snapshot).await.unwrap();
    assert_eq!(report.skipped, vec!["thoughts_saved_articles".to_string()]);
    assert_eq!(report.followed_authors, 1);
}

// ============================================================================
// Registry toggle involution
// ============================================================================

mod toggle_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Toggling any registry twice always lands back where it started,
        /// whatever the key looks like.
        #[test]
        fn prop_double_toggle_is_identity(key in "[a-zA-Z0-9 ._-]{1,48}") {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let db = test_db().await;

                let first = db.toggle_bookmark(&key).await.unwrap();
                prop_assert!(first);
                let second = db.toggle_bookmark(&key).await.unwrap();
                prop_assert!(!second);
                prop_assert!(db.bookmarked_ids().await.unwrap().is_empty());

                let first = db.toggle_followed_author(&key).await.unwrap();
                prop_assert!(first);
                let second = db.toggle_followed_author(&key).await.unwrap();
                prop_assert!(!second);
                prop_assert!(db.followed_authors().await.unwrap().is_empty());

                Ok(())
            })?;
        }

        /// A single toggle is always present exactly once, never duplicated.
        #[test]
        fn prop_single_toggle_inserts_once(key in "[a-zA-Z0-9 ._-]{1,48}") {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let db = test_db().await;
                db.toggle_download(&key).await.unwrap();
                let ids = db.downloaded_ids().await.unwrap();
                prop_assert_eq!(ids, vec![key.clone()]);
                Ok(())
            })?;
        }
    }
}
