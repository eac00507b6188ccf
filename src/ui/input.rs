//! Keyboard input handling.
//!
//! Dispatch order matters: overlays (help, confirmation) swallow input
//! first, then the fatal state, then any open editor prompt, then search
//! mode and the form views, and only then the shared list-view keys.

use crate::app::{
    App, AppEvent, ConfirmAction, DeleteOrigin, EditorField, EditorPrompt, PromptKind,
    SettingsField, Tab, View,
};
use crate::util::{classify_cover_source, openable_cover_url, CoverSource, MAX_SEARCH_QUERY_LENGTH};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use std::path::PathBuf;
use tokio::sync::mpsc;

use super::help;
use super::helpers::{spawn_cover_read, spawn_draft_read};
use super::loop_runner::Action;

/// Handle a key press. Returns [`Action::Quit`] when the application should
/// exit.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if app.show_help {
        return Ok(handle_help_overlay(app, code));
    }

    if app.pending_confirm.is_some() {
        return handle_confirm(app, code).await;
    }

    if app.fatal.is_some() {
        return handle_fatal(app, code).await;
    }

    if app.view == View::Editor {
        if app
            .editor
            .as_ref()
            .map(|e| e.prompt.is_some())
            .unwrap_or(false)
        {
            return handle_editor_prompt(app, code, event_tx);
        }
        return handle_editor(app, code, modifiers).await;
    }

    if app.search_mode {
        return Ok(handle_search(app, code));
    }

    match app.view {
        View::Settings => handle_settings(app, code, modifiers).await,
        View::Feedback => handle_feedback(app, code).await,
        View::Subscribe => handle_subscribe(app, code).await,
        _ => handle_browse(app, code, modifiers, event_tx).await,
    }
}

fn handle_help_overlay(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app
                .help_scroll_offset
                .saturating_add(1)
                .min(help::content_lines().saturating_sub(1));
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        _ => {}
    }
    Action::Continue
}

async fn handle_confirm(app: &mut App, code: KeyCode) -> Result<Action> {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            let Some(confirm) = app.pending_confirm.take() else {
                return Ok(Action::Continue);
            };
            match confirm {
                ConfirmAction::DeleteStory {
                    article_id, origin, ..
                } => app.delete_story(&article_id, origin).await?,
                ConfirmAction::SignOut => app.sign_out().await?,
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_confirm = None;
        }
        _ => {}
    }
    Ok(Action::Continue)
}

async fn handle_fatal(app: &mut App, code: KeyCode) -> Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Char('r') => {
            if let Err(e) = app.recover_from_fatal().await {
                app.set_fatal(format!("Reload failed: {}", e));
            }
        }
        _ => {}
    }
    Ok(Action::Continue)
}

// ============================================================================
// Search
// ============================================================================

fn handle_search(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char(c) => {
            if app.search_input.chars().count() < MAX_SEARCH_QUERY_LENGTH {
                app.search_input.push(c);
                app.recompute_feed();
            }
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            app.recompute_feed();
        }
        KeyCode::Enter => {
            app.search_mode = false;
        }
        KeyCode::Esc => {
            app.search_mode = false;
            app.search_input.clear();
            app.recompute_feed();
        }
        _ => {}
    }
    Action::Continue
}

// ============================================================================
// Editor
// ============================================================================

async fn handle_editor(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match code {
            KeyCode::Char('s') => app.publish_story().await?,
            KeyCode::Char('k') => {
                let count = app.categories().len().max(1);
                if let Some(editor) = app.editor.as_mut() {
                    editor.category_index = (editor.category_index + 1) % count;
                }
            }
            KeyCode::Char('o') => {
                if let Some(editor) = app.editor.as_mut() {
                    editor.prompt = Some(EditorPrompt {
                        kind: PromptKind::CoverImage,
                        input: String::new(),
                    });
                }
            }
            KeyCode::Char('d') => {
                if let Some(editor) = app.editor.as_mut() {
                    editor.prompt = Some(EditorPrompt {
                        kind: PromptKind::DraftFile,
                        input: String::new(),
                    });
                }
            }
            _ => {}
        }
        return Ok(Action::Continue);
    }

    let Some(editor) = app.editor.as_mut() else {
        return Ok(Action::Continue);
    };
    match code {
        KeyCode::Esc => app.close_editor(),
        KeyCode::Tab => {
            editor.focus = match editor.focus {
                EditorField::Title => EditorField::Body,
                EditorField::Body => EditorField::Title,
            };
        }
        KeyCode::Enter => match editor.focus {
            // Titles are one line; Enter moves on to the body.
            EditorField::Title => editor.focus = EditorField::Body,
            EditorField::Body => editor.body.push('\n'),
        },
        KeyCode::Backspace => {
            match editor.focus {
                EditorField::Title => editor.title.pop(),
                EditorField::Body => editor.body.pop(),
            };
        }
        KeyCode::Char(c) => match editor.focus {
            EditorField::Title => editor.title.push(c),
            EditorField::Body => editor.body.push(c),
        },
        _ => {}
    }
    Ok(Action::Continue)
}

fn handle_editor_prompt(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Simple edits mutate the prompt in place; Enter takes the prompt out
    // so the actions below can borrow `app` freely.
    {
        let Some(prompt) = app.editor.as_mut().and_then(|e| e.prompt.as_mut()) else {
            return Ok(Action::Continue);
        };
        match code {
            KeyCode::Char(c) => {
                prompt.input.push(c);
                return Ok(Action::Continue);
            }
            KeyCode::Backspace => {
                prompt.input.pop();
                return Ok(Action::Continue);
            }
            KeyCode::Esc => {}
            KeyCode::Enter => {}
            _ => return Ok(Action::Continue),
        }
    }

    let Some(prompt) = app.editor.as_mut().and_then(|e| e.prompt.take()) else {
        return Ok(Action::Continue);
    };
    if code == KeyCode::Esc {
        return Ok(Action::Continue);
    }

    let input = prompt.input.trim().to_string();
    if input.is_empty() {
        return Ok(Action::Continue);
    }
    match prompt.kind {
        PromptKind::CoverImage => match classify_cover_source(&input) {
            CoverSource::LocalFile(path) => spawn_cover_read(app, path, event_tx),
            CoverSource::Web(_) | CoverSource::DataUri | CoverSource::Opaque => {
                if let Some(editor) = app.editor.as_mut() {
                    editor.cover = Some(input);
                }
                app.set_status("Cover image set");
            }
        },
        PromptKind::DraftFile => {
            let path = PathBuf::from(&input);
            if let Some(ext) = crate::app::draft_rejection(&path) {
                app.set_status(format!(
                    "{} import isn't supported. Use a .txt or .md draft.",
                    ext
                ));
            } else {
                spawn_draft_read(app, path, event_tx);
            }
        }
    }
    Ok(Action::Continue)
}

// ============================================================================
// Settings / Feedback / Subscribe Forms
// ============================================================================

async fn handle_settings(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        if code == KeyCode::Char('x') && app.signed_in() {
            app.pending_confirm = Some(ConfirmAction::SignOut);
        }
        return Ok(Action::Continue);
    }

    match code {
        KeyCode::Esc => app.exit_to_feed(),
        KeyCode::Tab => {
            app.settings_field = match app.settings_field {
                SettingsField::Name => SettingsField::Email,
                SettingsField::Email => SettingsField::Name,
            };
        }
        KeyCode::Enter => app.save_settings().await?,
        KeyCode::Backspace => {
            match app.settings_field {
                SettingsField::Name => app.settings_name.pop(),
                SettingsField::Email => app.settings_email.pop(),
            };
        }
        KeyCode::Char(c) => match app.settings_field {
            SettingsField::Name => app.settings_name.push(c),
            SettingsField::Email => app.settings_email.push(c),
        },
        _ => {}
    }
    Ok(Action::Continue)
}

async fn handle_feedback(app: &mut App, code: KeyCode) -> Result<Action> {
    match code {
        KeyCode::Esc => {
            app.feedback_input.clear();
            app.exit_to_feed();
        }
        KeyCode::Enter => {
            if app.feedback_input.trim().is_empty() {
                app.set_status("Write something first!");
            } else {
                app.submit_feedback();
                app.exit_to_feed();
            }
        }
        KeyCode::Backspace => {
            app.feedback_input.pop();
        }
        KeyCode::Char(c) => app.feedback_input.push(c),
        _ => {}
    }
    Ok(Action::Continue)
}

async fn handle_subscribe(app: &mut App, code: KeyCode) -> Result<Action> {
    match code {
        KeyCode::Esc => app.exit_to_feed(),
        KeyCode::Enter => app.complete_subscription().await?,
        KeyCode::Char('q') => return Ok(Action::Quit),
        _ => {}
    }
    Ok(Action::Continue)
}

// ============================================================================
// Browse Views (feed, reader, library lists, categories, profile, audio)
// ============================================================================

async fn handle_browse(
    app: &mut App,
    code: KeyCode,
    _modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Char('?') => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => {
            if app.view == View::Reader {
                app.scroll_down(1);
                app.clamp_reader_scroll();
            } else {
                app.nav_down();
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.view == View::Reader {
                app.scroll_up(1);
                app.clamp_reader_scroll();
            } else {
                app.nav_up();
            }
        }
        KeyCode::PageDown => {
            if app.view == View::Reader {
                app.scroll_down(app.reader_visible_lines.max(1));
                app.clamp_reader_scroll();
            }
        }
        KeyCode::PageUp => {
            if app.view == View::Reader {
                app.scroll_up(app.reader_visible_lines.max(1));
            }
        }

        KeyCode::Esc => match app.view {
            View::Reader => app.exit_reader(),
            View::Feed => {
                // Clears any active filters; a bare Esc on an unfiltered
                // feed does nothing.
                if app.active_category.is_some() || !app.search_input.is_empty() {
                    app.active_category = None;
                    app.search_input.clear();
                    app.recompute_feed();
                }
            }
            _ => app.exit_to_feed(),
        },

        KeyCode::Enter => match app.view {
            View::Categories => app.choose_selected_category(),
            View::Reader => {}
            _ => app.open_selected().await?,
        },

        // Feed tabs; in the reader digits open the numbered suggestions.
        KeyCode::Char(c @ '1'..='3') => {
            let n = (c as u8 - b'1') as usize;
            if app.view == View::Reader {
                if let Some(id) = app.reader_suggestions().get(n).map(|a| a.id.to_string()) {
                    app.open_article(&id).await?;
                }
            } else if app.view == View::Feed {
                app.switch_tab(Tab::ALL[n]);
            }
        }
        KeyCode::Tab => {
            if app.view == View::Feed {
                let current = Tab::ALL
                    .iter()
                    .position(|t| *t == app.tab)
                    .unwrap_or_default();
                app.switch_tab(Tab::ALL[(current + 1) % Tab::ALL.len()]);
            }
        }
        KeyCode::Char('/') => {
            if app.view == View::Feed {
                app.search_mode = true;
            }
        }

        // Registry toggles on the targeted story
        KeyCode::Char('s') => {
            if let Some(id) = app.target_article_id() {
                app.toggle_bookmark(&id).await?;
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = app.target_article_id() {
                app.toggle_download(&id).await?;
            }
        }
        KeyCode::Char('f') => {
            if let Some(author) = target_author(app) {
                let following = app.toggle_follow(&author).await?;
                app.handle_follows_changed();
                if let Err(e) = event_tx
                    .send(AppEvent::FollowsChanged { author, following })
                    .await
                {
                    tracing::warn!(error = %e, "Follow broadcast failed");
                }
            }
        }
        KeyCode::Char('a') => {
            if app.view != View::Profile {
                if let Some(author) = target_author(app) {
                    app.open_profile(&author);
                }
            }
        }

        // View switches
        KeyCode::Char('c') => app.show_view(View::Categories),
        KeyCode::Char('b') => app.show_view(View::Saved),
        KeyCode::Char('h') => app.show_view(View::History),
        KeyCode::Char('w') => app.show_view(View::Downloads),
        KeyCode::Char('u') => app.show_view(View::Audio),
        KeyCode::Char('g') => app.show_view(View::Feedback),
        KeyCode::Char('e') => app.enter_settings(),
        KeyCode::Char('n') => {
            if app.require_sign_in() {
                app.open_editor();
            }
        }
        KeyCode::Char('p') => {
            if app.premium {
                app.set_status("You're already a Premium member");
            } else if app.require_sign_in() {
                app.view = View::Subscribe;
            }
        }

        // Open the reader article's cover image in the browser
        KeyCode::Char('o') => {
            if app.view == View::Reader {
                if let Some(article) = app.reader_article.as_ref() {
                    match openable_cover_url(&article.image) {
                        Ok(url) => {
                            if let Err(e) = open::that(url.as_str()) {
                                app.set_status(format!("Couldn't open browser: {}", e));
                            } else {
                                app.set_status("Opening cover image...");
                            }
                        }
                        Err(e) => app.set_status(format!("Can't open cover: {}", e)),
                    }
                }
            }
        }

        // Destructive actions
        KeyCode::Char('x') => handle_delete_key(app).await?,
        KeyCode::Char('X') => {
            if app.view == View::History {
                app.clear_history().await?;
            }
        }

        _ => {}
    }
    Ok(Action::Continue)
}

/// The author an author-scoped key (follow, profile) refers to.
fn target_author(app: &App) -> Option<String> {
    match app.view {
        View::Reader => app.reader_article.as_ref().map(|a| a.author.to_string()),
        View::Profile => app.profile_author.clone(),
        View::Feed => app.selected_feed_article().map(|a| a.author.to_string()),
        View::Saved => app
            .saved_articles()
            .get(app.list_selected)
            .map(|a| a.author.to_string()),
        View::History => app
            .history_articles()
            .get(app.list_selected)
            .map(|(_, a)| a.author.to_string()),
        View::Downloads => app
            .downloaded_articles()
            .get(app.list_selected)
            .map(|a| a.author.to_string()),
        _ => None,
    }
}

/// Dispatch the `x` key: remove a history entry, or delete a story from the
/// reader or profile surface, each behind its own gate.
async fn handle_delete_key(app: &mut App) -> Result<()> {
    match app.view {
        View::History => app.remove_selected_history_entry().await?,
        View::Reader => {
            let Some(article) = app.reader_article.as_ref() else {
                return Ok(());
            };
            if !app.reader_delete_allowed(article) {
                return Ok(());
            }
            let article_id = article.id.to_string();
            let title = article.title.to_string();
            request_delete(app, article_id, title, DeleteOrigin::Reader).await?;
        }
        View::Profile => {
            let Some(article) = app.profile_articles().get(app.list_selected).copied() else {
                return Ok(());
            };
            if !App::profile_delete_allowed(article) {
                return Ok(());
            }
            let article_id = article.id.to_string();
            let title = article.title.to_string();
            request_delete(app, article_id, title, DeleteOrigin::Profile).await?;
        }
        _ => {}
    }
    Ok(())
}

async fn request_delete(
    app: &mut App,
    article_id: String,
    title: String,
    origin: DeleteOrigin,
) -> Result<()> {
    if app.config.confirm_delete {
        app.pending_confirm = Some(ConfirmAction::DeleteStory {
            article_id,
            title,
            origin,
        });
    } else {
        app.delete_story(&article_id, origin).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::{Article, ArticleOrigin, Database, Identity};
    use std::sync::Arc;

    fn article(id: &str, title: &str, author: &str, category: &str) -> Article {
        Article {
            id: Arc::from(id),
            title: Arc::from(title),
            author: Arc::from(author),
            category: Arc::from(category),
            excerpt: Arc::from("..."),
            body: Arc::from("Body."),
            published: Arc::from("1 May 2026"),
            read_time: Arc::from("1 min read"),
            trending: false,
            image: Arc::from("https://example.com/a.jpg"),
            origin: ArticleOrigin::Seed,
        }
    }

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let mut app = App::new(db, Config::default());
        app.articles = Arc::new(vec![
            article("seed-1", "Slow Mornings", "Ada", "Culture"),
            article("seed-2", "Night Trains", "Ben", "Travel"),
        ]);
        app.recompute_feed();
        app
    }

    fn tx() -> mpsc::Sender<AppEvent> {
        mpsc::channel(8).0
    }

    async fn press(app: &mut App, code: KeyCode) {
        handle_input(app, code, KeyModifiers::NONE, &tx())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_search_typing_filters_immediately() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('/')).await;
        assert!(app.search_mode);
        for c in "night".chars() {
            press(&mut app, KeyCode::Char(c)).await;
        }
        assert_eq!(app.feed.len(), 1);
        press(&mut app, KeyCode::Esc).await;
        assert!(!app.search_mode);
        assert!(app.search_input.is_empty());
        assert_eq!(app.feed.len(), 2);
    }

    #[tokio::test]
    async fn test_search_enter_keeps_query() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('/')).await;
        press(&mut app, KeyCode::Char('a')).await;
        press(&mut app, KeyCode::Enter).await;
        assert!(!app.search_mode);
        assert_eq!(app.search_input, "a");
    }

    #[tokio::test]
    async fn test_digit_switches_tab() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('3')).await;
        assert_eq!(app.tab, Tab::Following);
        press(&mut app, KeyCode::Char('1')).await;
        assert_eq!(app.tab, Tab::ForYou);
    }

    #[tokio::test]
    async fn test_open_while_signed_out_routes_to_settings() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(app.view, View::Settings);
        assert!(app.reader_article.is_none());
    }

    #[tokio::test]
    async fn test_open_while_signed_in_enters_reader() {
        let mut app = test_app().await;
        app.identity = Some(Identity {
            name: "Maya".to_string(),
            email: "maya@example.com".to_string(),
        });
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(app.view, View::Reader);
        assert_eq!(
            app.reader_article.as_ref().map(|a| &*a.id),
            Some("seed-1")
        );
        assert_eq!(app.history.len(), 1);
    }

    #[tokio::test]
    async fn test_write_key_is_gated() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('n')).await;
        assert_eq!(app.view, View::Settings);
        assert!(app.editor.is_none());
    }

    #[tokio::test]
    async fn test_follow_toggle_updates_list() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('f')).await;
        assert_eq!(app.followed, vec!["Ada".to_string()]);
        press(&mut app, KeyCode::Char('f')).await;
        assert!(app.followed.is_empty());
    }

    #[tokio::test]
    async fn test_editor_types_into_focused_field() {
        let mut app = test_app().await;
        app.open_editor();
        press(&mut app, KeyCode::Char('H')).await;
        press(&mut app, KeyCode::Char('i')).await;
        press(&mut app, KeyCode::Tab).await;
        press(&mut app, KeyCode::Char('x')).await;
        let editor = app.editor.as_ref().unwrap();
        assert_eq!(editor.title, "Hi");
        assert_eq!(editor.body, "x");
    }

    #[tokio::test]
    async fn test_editor_publish_requires_title_and_body() {
        let mut app = test_app().await;
        app.open_editor();
        handle_input(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL, &tx())
            .await
            .unwrap();
        assert_eq!(app.view, View::Editor);
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_draft_prompt_rejects_binary_formats() {
        let mut app = test_app().await;
        app.open_editor();
        handle_input(&mut app, KeyCode::Char('d'), KeyModifiers::CONTROL, &tx())
            .await
            .unwrap();
        for c in "notes.pdf".chars() {
            press(&mut app, KeyCode::Char(c)).await;
        }
        press(&mut app, KeyCode::Enter).await;
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("PDF"));
    }

    #[tokio::test]
    async fn test_cover_prompt_stores_web_url_directly() {
        let mut app = test_app().await;
        app.open_editor();
        handle_input(&mut app, KeyCode::Char('o'), KeyModifiers::CONTROL, &tx())
            .await
            .unwrap();
        for c in "https://example.com/cover.jpg".chars() {
            press(&mut app, KeyCode::Char(c)).await;
        }
        press(&mut app, KeyCode::Enter).await;
        let editor = app.editor.as_ref().unwrap();
        assert_eq!(
            editor.cover.as_deref(),
            Some("https://example.com/cover.jpg")
        );
    }

    #[tokio::test]
    async fn test_delete_from_profile_asks_for_confirmation() {
        let mut app = test_app().await;
        app.articles = Arc::new(vec![article(
            "user-1700000000000",
            "My Story",
            "Maya",
            "Culture",
        )]);
        app.open_profile("Maya");
        press(&mut app, KeyCode::Char('x')).await;
        assert!(matches!(
            app.pending_confirm,
            Some(ConfirmAction::DeleteStory {
                origin: DeleteOrigin::Profile,
                ..
            })
        ));
        // Declining leaves everything in place
        press(&mut app, KeyCode::Char('n')).await;
        assert!(app.pending_confirm.is_none());
        assert_eq!(app.articles.len(), 1);
    }

    #[tokio::test]
    async fn test_seed_stories_offer_no_profile_delete() {
        let mut app = test_app().await;
        app.open_profile("Ada");
        press(&mut app, KeyCode::Char('x')).await;
        assert!(app.pending_confirm.is_none());
    }

    #[tokio::test]
    async fn test_sign_out_confirmation_flow() {
        let mut app = test_app().await;
        app.identity = Some(Identity {
            name: "Maya".to_string(),
            email: String::new(),
        });
        app.enter_settings();
        handle_input(&mut app, KeyCode::Char('x'), KeyModifiers::CONTROL, &tx())
            .await
            .unwrap();
        assert!(matches!(app.pending_confirm, Some(ConfirmAction::SignOut)));
        press(&mut app, KeyCode::Char('y')).await;
        assert!(app.identity.is_none());
        assert_eq!(app.view, View::Feed);
    }

    #[tokio::test]
    async fn test_feed_esc_clears_filters() {
        let mut app = test_app().await;
        app.active_category = Some("Travel".to_string());
        app.recompute_feed();
        assert_eq!(app.feed.len(), 1);
        press(&mut app, KeyCode::Esc).await;
        assert!(app.active_category.is_none());
        assert_eq!(app.feed.len(), 2);
    }

    #[tokio::test]
    async fn test_help_overlay_swallows_input() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('?')).await;
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('3')).await;
        assert_eq!(app.tab, Tab::ForYou);
        press(&mut app, KeyCode::Esc).await;
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn test_quit_key() {
        let mut app = test_app().await;
        let action = handle_input(&mut app, KeyCode::Char('q'), KeyModifiers::NONE, &tx())
            .await
            .unwrap();
        assert!(matches!(action, Action::Quit));
    }
}
