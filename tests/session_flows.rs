//! Integration tests for headless reading sessions: the feed pipeline,
//! sign-in gating, history, and the premium grant lifecycle.
//!
//! These drive [`App`] directly against an in-memory database, the same
//! state the TUI event loop mutates.

use mull::app::{App, FeedState, Tab, View};
use mull::config::Config;
use mull::storage::{ArticleRecord, Database};
use pretty_assertions::assert_eq;

fn record(
    id: &str,
    title: &str,
    author: &str,
    category: &str,
    trending: bool,
) -> ArticleRecord {
    ArticleRecord {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        category: category.to_string(),
        excerpt: format!("{} excerpt...", title),
        full_content: format!("{} full body.", title),
        date: "1 January 2026".to_string(),
        read_time: "1 min read".to_string(),
        is_trending: trending,
        image: String::new(),
    }
}

async fn session() -> App {
    let db = Database::open(":memory:").await.unwrap();
    db.sync_seed_articles(&[
        record("seed-1", "Slow Mornings", "Ada Lovelace", "Culture", true),
        record("seed-2", "Night Trains", "Grace Hopper", "Travel", false),
        record("seed-3", "Silent Keyboards", "Ada Lovelace", "Technology", true),
        record("seed-4", "Harbor Lights", "Linus Wei", "Travel", false),
    ])
    .await
    .unwrap();

    let mut app = App::new(db, Config::default());
    app.load_all().await.unwrap();
    app
}

fn feed_ids(app: &App) -> Vec<String> {
    app.feed
        .indices()
        .iter()
        .filter_map(|&i| app.articles.get(i).map(|a| a.id.to_string()))
        .collect()
}

// ============================================================================
// Feed pipeline
// ============================================================================

#[tokio::test]
async fn test_filter_result_ignores_input_order() {
    let mut app = session().await;

    app.switch_tab(Tab::Trending);
    app.active_category = Some("Technology".to_string());
    app.search_input = "silent".to_string();
    app.recompute_feed();
    let one_way = feed_ids(&app);

    let mut other = session().await;
    other.search_input = "silent".to_string();
    other.active_category = Some("Technology".to_string());
    other.recompute_feed();
    other.switch_tab(Tab::Trending);
    let other_way = feed_ids(&other);

    assert_eq!(one_way, other_way);
    assert_eq!(one_way, vec!["seed-3".to_string()]);
}

#[tokio::test]
async fn test_following_tab_empty_state_wins_over_search() {
    let mut app = session().await;
    app.switch_tab(Tab::Following);
    app.search_input = "anything".to_string();
    app.recompute_feed();

    // With no follows, the Following tab short-circuits to its empty state
    // before any other filter is considered.
    assert_eq!(app.feed, FeedState::FollowingEmpty);
}

#[tokio::test]
async fn test_follow_change_refreshes_following_tab() {
    let mut app = session().await;
    app.switch_tab(Tab::Following);
    assert_eq!(app.feed, FeedState::FollowingEmpty);

    app.toggle_follow("Ada Lovelace").await.unwrap();
    app.handle_follows_changed();

    assert_eq!(
        feed_ids(&app),
        vec!["seed-1".to_string(), "seed-3".to_string()]
    );
}

#[tokio::test]
async fn test_search_with_no_hits_reports_no_matches() {
    let mut app = session().await;
    app.search_input = "zzz nothing matches".to_string();
    app.recompute_feed();
    assert_eq!(app.feed, FeedState::NoMatches);
}

#[tokio::test]
async fn test_category_toggle_clears_active_filter() {
    let mut app = session().await;
    app.show_view(View::Categories);

    // Categories come back in first-seen working-set order.
    let categories: Vec<String> = app.categories().iter().map(|c| c.to_string()).collect();
    assert_eq!(categories, vec!["Culture", "Travel", "Technology"]);

    app.list_selected = 1;
    app.choose_selected_category();
    assert_eq!(app.active_category.as_deref(), Some("Travel"));
    assert_eq!(app.view, View::Feed);

    app.show_view(View::Categories);
    app.list_selected = 1;
    app.choose_selected_category();
    assert_eq!(app.active_category, None);
}

// ============================================================================
// Sign-in gating
// ============================================================================

#[tokio::test]
async fn test_reading_requires_sign_in() {
    let mut app = session().await;
    app.open_selected().await.unwrap();

    assert_eq!(app.view, View::Settings);
    assert!(app.reader_article.is_none());
    assert!(app.history.is_empty());
}

#[tokio::test]
async fn test_saving_settings_signs_in_and_unlocks_reading() {
    let mut app = session().await;
    app.enter_settings();
    app.settings_name = "Maya".to_string();
    app.settings_email = "maya@example.com".to_string();
    app.save_settings().await.unwrap();
    assert!(app.signed_in());

    app.view = View::Feed;
    app.open_selected().await.unwrap();
    assert_eq!(app.view, View::Reader);
}

#[tokio::test]
async fn test_sign_out_keeps_library_intact() {
    let mut app = session().await;
    app.enter_settings();
    app.settings_name = "Maya".to_string();
    app.save_settings().await.unwrap();

    app.toggle_bookmark("seed-1").await.unwrap();
    app.toggle_follow("Ada Lovelace").await.unwrap();
    app.open_article("seed-2").await.unwrap();

    app.sign_out().await.unwrap();
    assert!(!app.signed_in());
    assert_eq!(app.view, View::Feed);

    // Everything except the identity survives.
    app.load_all().await.unwrap();
    assert_eq!(app.bookmarks, vec!["seed-1".to_string()]);
    assert_eq!(app.followed, vec!["Ada Lovelace".to_string()]);
    assert_eq!(app.history.len(), 1);
}

// ============================================================================
// History
// ============================================================================

#[tokio::test]
async fn test_opening_articles_builds_mru_history() {
    let mut app = session().await;
    app.open_article("seed-1").await.unwrap();
    app.open_article("seed-2").await.unwrap();
    app.open_article("seed-1").await.unwrap();

    let ids: Vec<&str> = app
        .history
        .iter()
        .map(|e| e.article_id.as_str())
        .collect();
    assert_eq!(ids, vec!["seed-1", "seed-2"]);
    assert_eq!(app.view, View::Reader);
}

#[tokio::test]
async fn test_remove_selected_history_entry() {
    let mut app = session().await;
    app.open_article("seed-1").await.unwrap();
    app.open_article("seed-2").await.unwrap();
    app.show_view(View::History);

    // Most recent first; remove the top entry.
    app.remove_selected_history_entry().await.unwrap();
    let ids: Vec<&str> = app
        .history
        .iter()
        .map(|e| e.article_id.as_str())
        .collect();
    assert_eq!(ids, vec!["seed-1"]);
}

#[tokio::test]
async fn test_clear_history() {
    let mut app = session().await;
    app.open_article("seed-1").await.unwrap();
    app.clear_history().await.unwrap();
    assert!(app.history.is_empty());
    assert!(app.db.get_history().await.unwrap().is_empty());
}

// ============================================================================
// Premium
// ============================================================================

#[tokio::test]
async fn test_premium_grant_is_keyed_to_the_username() {
    let mut app = session().await;

    app.enter_settings();
    app.settings_name = "Maya".to_string();
    app.save_settings().await.unwrap();
    app.complete_subscription().await.unwrap();
    assert!(app.premium);

    // A different name signs in: no grant.
    app.enter_settings();
    app.settings_name = "Noor".to_string();
    app.save_settings().await.unwrap();
    assert!(!app.premium);

    // The original name returns: the grant is waiting.
    app.enter_settings();
    app.settings_name = "Maya".to_string();
    app.save_settings().await.unwrap();
    assert!(app.premium);
}

#[tokio::test]
async fn test_subscription_requires_identity() {
    let mut app = session().await;
    app.complete_subscription().await.unwrap();
    assert!(!app.premium);
}

// ============================================================================
// Reader suggestions
// ============================================================================

#[tokio::test]
async fn test_reader_suggestions_skip_the_open_story() {
    let mut app = session().await;
    app.enter_settings();
    app.settings_name = "Maya".to_string();
    app.save_settings().await.unwrap();
    app.open_article("seed-1").await.unwrap();

    let suggestions = app.reader_suggestions();
    assert_eq!(suggestions.len(), 3);
    assert!(suggestions.iter().all(|a| &*a.id != "seed-1"));
}
