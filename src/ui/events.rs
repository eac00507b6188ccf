//! Application event handling.
//!
//! This module processes background task completion events (editor file
//! reads) and cross-view notifications (follow toggles).

use crate::app::{App, AppEvent, EditorField};
use crate::util::strip_control_chars;

/// Handle application events from background tasks.
///
/// All handlers mutate [`App`] directly; the caller sets `needs_redraw`
/// before dispatching, so state changes always reach the next frame.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::FollowsChanged { author, following } => {
            tracing::debug!(author = %author, following, "Follow change broadcast");
            app.handle_follows_changed();
        }
        AppEvent::CoverImageRead { data_uri } => {
            if let Some(editor) = app.editor.as_mut() {
                editor.cover = Some(data_uri);
                app.set_status("Cover image attached");
            }
            // Editor already closed: the read raced a publish or cancel,
            // and the later action wins.
        }
        AppEvent::CoverImageFailed { error } => {
            tracing::warn!(error = %error, "Cover image read failed");
            app.set_status(format!("Couldn't read cover image: {}", error));
        }
        AppEvent::DraftFileRead {
            heading,
            stem,
            body,
        } => {
            let Some(editor) = app.editor.as_mut() else {
                return;
            };
            if editor.title.is_empty() {
                editor.title = heading.unwrap_or(stem);
            }
            editor.body = strip_control_chars(&body).into_owned();
            editor.focus = EditorField::Body;
            app.set_status("Draft imported");
        }
        AppEvent::DraftFileFailed { error } => {
            tracing::warn!(error = %error, "Draft import failed");
            app.set_status(format!("Couldn't import draft: {}", error));
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            app.set_fatal(format!("Background task '{}' failed: {}", task, error));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::View;
    use crate::config::Config;
    use crate::storage::Database;

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        App::new(db, Config::default())
    }

    #[tokio::test]
    async fn test_cover_read_lands_in_open_editor() {
        let mut app = test_app().await;
        app.open_editor();

        handle_app_event(
            &mut app,
            AppEvent::CoverImageRead {
                data_uri: "data:image/png;base64,AAAA".to_string(),
            },
        );

        assert_eq!(
            app.editor.as_ref().unwrap().cover.as_deref(),
            Some("data:image/png;base64,AAAA")
        );
    }

    #[tokio::test]
    async fn test_cover_read_after_editor_closed_is_dropped() {
        let mut app = test_app().await;
        handle_app_event(
            &mut app,
            AppEvent::CoverImageRead {
                data_uri: "data:image/png;base64,AAAA".to_string(),
            },
        );
        assert!(app.editor.is_none());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_draft_read_fills_title_and_body() {
        let mut app = test_app().await;
        app.open_editor();

        handle_app_event(
            &mut app,
            AppEvent::DraftFileRead {
                heading: Some("From The File".to_string()),
                stem: "draft".to_string(),
                body: "Body text.".to_string(),
            },
        );

        let editor = app.editor.as_ref().unwrap();
        assert_eq!(editor.title, "From The File");
        assert_eq!(editor.body, "Body text.");
        assert_eq!(editor.focus, EditorField::Body);
    }

    #[tokio::test]
    async fn test_draft_read_keeps_typed_title() {
        let mut app = test_app().await;
        app.open_editor();
        app.editor.as_mut().unwrap().title = "Already Typed".to_string();

        handle_app_event(
            &mut app,
            AppEvent::DraftFileRead {
                heading: Some("From The File".to_string()),
                stem: "draft".to_string(),
                body: "Body.".to_string(),
            },
        );

        assert_eq!(app.editor.as_ref().unwrap().title, "Already Typed");
    }

    #[tokio::test]
    async fn test_draft_read_without_heading_uses_stem() {
        let mut app = test_app().await;
        app.open_editor();

        handle_app_event(
            &mut app,
            AppEvent::DraftFileRead {
                heading: None,
                stem: "night-walk".to_string(),
                body: "Body.".to_string(),
            },
        );

        assert_eq!(app.editor.as_ref().unwrap().title, "night-walk");
    }

    #[tokio::test]
    async fn test_task_panic_enters_fatal_state() {
        let mut app = test_app().await;
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "cover_read",
                error: "boom".to_string(),
            },
        );
        assert!(app.fatal.is_some());
        assert_eq!(app.view, View::Feed);
    }

    #[tokio::test]
    async fn test_follows_changed_refreshes_following_tab() {
        use crate::app::{FeedState, Tab};
        use crate::storage::{Article, ArticleOrigin};
        use std::sync::Arc;

        let mut app = test_app().await;
        app.articles = Arc::new(vec![Article {
            id: Arc::from("seed-1"),
            title: Arc::from("One"),
            author: Arc::from("Ada"),
            category: Arc::from("Culture"),
            excerpt: Arc::from("..."),
            body: Arc::from("Body."),
            published: Arc::from("1 May 2026"),
            read_time: Arc::from("1 min read"),
            trending: false,
            image: Arc::from(""),
            origin: ArticleOrigin::Seed,
        }]);
        app.tab = Tab::Following;
        app.recompute_feed();
        assert_eq!(app.feed, FeedState::FollowingEmpty);

        app.followed = vec!["Ada".to_string()];
        handle_app_event(
            &mut app,
            AppEvent::FollowsChanged {
                author: "Ada".to_string(),
                following: true,
            },
        );

        assert_eq!(app.feed, FeedState::Results(vec![0]));
    }
}
