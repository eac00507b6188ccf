use crate::config::Config;
use crate::storage::{Article, ArticleOrigin, Database, HistoryEntry, Identity};
use crate::util;
use anyhow::Result;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;
use tokio::time::Instant;

/// Maximum scroll offset for the reader view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// How many results lead the feed as full-width featured cards.
pub const FEATURED_COUNT: usize = 2;

/// Window of the working set shown in the "Editor's Picks" sidebar.
const CURATED_START: usize = 10;
const CURATED_COUNT: usize = 3;

/// How many authors the "Who to Follow" sidebar suggests.
const SUGGESTED_AUTHOR_COUNT: usize = 3;

/// How many other stories the reader suggests below an article.
const READER_SUGGESTION_COUNT: usize = 3;

// ============================================================================
// Tabs and the Feed Pipeline
// ============================================================================

/// The three feed tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    ForYou,
    Trending,
    Following,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::ForYou, Tab::Trending, Tab::Following];

    pub fn label(self) -> &'static str {
        match self {
            Tab::ForYou => "For You",
            Tab::Trending => "Trending",
            Tab::Following => "Following",
        }
    }

    /// Parse a tab from its display label (used for the `default_tab`
    /// config key). Unknown labels return None.
    pub fn from_label(label: &str) -> Option<Tab> {
        match label {
            "For You" => Some(Tab::ForYou),
            "Trending" => Some(Tab::Trending),
            "Following" => Some(Tab::Following),
            _ => None,
        }
    }
}

/// Outcome of running the feed pipeline over the working set.
///
/// `Results` holds indices into the working set, in display order. The two
/// empty outcomes are distinct because they render differently: an empty
/// Following tab invites the user to follow someone, while an over-filtered
/// feed suggests clearing filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    Results(Vec<usize>),
    /// Following tab with nobody followed. Decided before any other filter.
    FollowingEmpty,
    /// Filters produced no matches.
    NoMatches,
}

impl FeedState {
    pub fn indices(&self) -> &[usize] {
        match self {
            FeedState::Results(indices) => indices,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.indices().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Run the feed pipeline: tab filter, then category filter, then search.
///
/// Pure over its inputs so the whole pipeline is testable as data-in,
/// data-out. Stage order is observable and load-bearing:
///
/// 1. The Following tab with an empty follow list short-circuits to
///    [`FeedState::FollowingEmpty`] before category or search apply.
/// 2. Category match is exact and case-sensitive.
/// 3. Search is a trimmed, lowercased substring match over title, author,
///    and category. Body and excerpt are deliberately not searched.
pub fn filter_feed(
    articles: &[Article],
    followed: &[String],
    tab: Tab,
    category: Option<&str>,
    query: &str,
) -> FeedState {
    if tab == Tab::Following && followed.is_empty() {
        return FeedState::FollowingEmpty;
    }

    let query = query.trim().to_lowercase();

    let indices: Vec<usize> = articles
        .iter()
        .enumerate()
        .filter(|(_, a)| match tab {
            Tab::ForYou => true,
            Tab::Trending => a.trending,
            Tab::Following => followed.iter().any(|f| f.as_str() == &*a.author),
        })
        .filter(|(_, a)| match category {
            Some(cat) => &*a.category == cat,
            None => true,
        })
        .filter(|(_, a)| {
            if query.is_empty() {
                return true;
            }
            a.title.to_lowercase().contains(query.as_str())
                || a.author.to_lowercase().contains(query.as_str())
                || a.category.to_lowercase().contains(query.as_str())
        })
        .map(|(i, _)| i)
        .collect();

    if indices.is_empty() {
        FeedState::NoMatches
    } else {
        FeedState::Results(indices)
    }
}

// ============================================================================
// Views
// ============================================================================

/// Current view. Every view renders into the main content area; overlays
/// (help, confirmation, fatal banner) stack on top of whichever is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Feed,
    Reader,
    Editor,
    Saved,
    History,
    Downloads,
    Categories,
    Profile,
    Settings,
    Subscribe,
    Audio,
    Feedback,
}

// ============================================================================
// Editor State
// ============================================================================

/// Which editor area receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Body,
}

/// What an open editor path prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// A cover image: URL, data URI, or local file path.
    CoverImage,
    /// A draft file (.txt or .md) to import into the editor.
    DraftFile,
}

/// A one-line input overlaying the editor, for cover and draft paths.
#[derive(Debug, Clone)]
pub struct EditorPrompt {
    pub kind: PromptKind,
    pub input: String,
}

/// Draft state for the compose view.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub title: String,
    pub body: String,
    /// Index into [`App::categories`]. Published stories carry the category
    /// at this index, or "General" when the catalog has none.
    pub category_index: usize,
    /// Resolved cover value: URL, data URI, or whatever the author gave us.
    /// None publishes with a generated placeholder.
    pub cover: Option<String>,
    pub focus: EditorField,
    pub prompt: Option<EditorPrompt>,
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            category_index: 0,
            cover: None,
            focus: EditorField::Title,
            prompt: None,
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Split an imported draft into an optional leading `# ` heading and the
/// remaining body. Without a heading the full text becomes the body and the
/// caller falls back to the file name for a title.
pub fn split_draft(text: &str) -> (Option<String>, String) {
    let mut lines = text.lines();
    match lines.next() {
        Some(first) if first.starts_with("# ") => {
            let title = first["# ".len()..].to_string();
            let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();
            (Some(title), body)
        }
        _ => (None, text.to_string()),
    }
}

/// File types the draft importer refuses: the platform never grew text
/// extraction for these. Returns the uppercased extension for the message.
pub fn draft_rejection(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "doc" | "docx" | "pdf" => Some(ext.to_ascii_uppercase()),
        _ => None,
    }
}

// ============================================================================
// Settings Form
// ============================================================================

/// Which settings input receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Name,
    Email,
}

// ============================================================================
// Confirmation Dialog
// ============================================================================

/// Which surface asked for a story deletion. The two surfaces carry
/// different gates and different prompts, and return somewhere different
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOrigin {
    Reader,
    Profile,
}

/// Pending confirmation for destructive operations.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    DeleteStory {
        article_id: String,
        title: String,
        origin: DeleteOrigin,
    },
    SignOut,
}

impl ConfirmAction {
    /// The question the confirmation overlay asks.
    pub fn prompt(&self) -> &'static str {
        match self {
            ConfirmAction::DeleteStory {
                origin: DeleteOrigin::Reader,
                ..
            } => "Delete story?",
            ConfirmAction::DeleteStory {
                origin: DeleteOrigin::Profile,
                ..
            } => "Delete this story permanently?",
            ConfirmAction::SignOut => "Are you sure you want to sign out?",
        }
    }
}

// ============================================================================
// Events
// ============================================================================

/// Events from background tasks and cross-view notifications.
#[derive(Debug)]
pub enum AppEvent {
    /// A follow was toggled somewhere. The Following tab re-filters on this,
    /// whichever view toggled it.
    FollowsChanged { author: String, following: bool },
    /// A local cover image was read and embedded as a data URI.
    CoverImageRead { data_uri: String },
    CoverImageFailed { error: String },
    /// A draft file was read. `heading` is the extracted `# ` title if the
    /// file had one; `stem` is the file name without extension, used as a
    /// title fallback.
    DraftFileRead {
        heading: Option<String>,
        stem: String,
        body: String,
    },
    DraftFileFailed { error: String },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state.
///
/// All reads and writes flow through here: input handlers mutate App (and
/// await [`Database`] calls inline), background tasks report through
/// [`AppEvent`], and rendering only ever reads.
pub struct App {
    pub db: Database,
    pub config: Config,

    // Library data, loaded from the database.
    /// Merged working set: local stories newest-first, then the seed
    /// catalog. Arc so views and suggestion lists clone cheaply.
    pub articles: Arc<Vec<Article>>,
    /// Saved article ids, in save order.
    pub bookmarks: Vec<String>,
    /// Followed author names, in follow order.
    pub followed: Vec<String>,
    /// Downloaded article ids, in download order.
    pub downloads: Vec<String>,
    /// Reading history, most recent first.
    pub history: Vec<HistoryEntry>,
    pub identity: Option<Identity>,
    /// Whether the signed-in identity has an active premium upgrade.
    pub premium: bool,

    // Feed pipeline inputs.
    pub tab: Tab,
    pub active_category: Option<String>,
    /// Raw search text as typed. The pipeline normalizes it.
    pub search_input: String,
    pub search_mode: bool,
    // Feed pipeline output.
    pub feed: FeedState,
    /// Selection within the feed results.
    pub selected: usize,

    // View state.
    pub view: View,
    /// Selection within list views (Saved, History, Downloads, Profile,
    /// Categories).
    pub list_selected: usize,
    /// Author whose profile is shown in [`View::Profile`].
    pub profile_author: Option<String>,
    /// The story open in the reader.
    pub reader_article: Option<Article>,
    pub scroll_offset: usize,
    /// Total rendered reader lines, updated each render for scroll clamping.
    pub reader_total_lines: usize,
    /// Reader viewport height from the last render.
    pub reader_visible_lines: usize,
    pub editor: Option<EditorState>,

    // Settings form.
    pub settings_name: String,
    pub settings_email: String,
    pub settings_field: SettingsField,

    // Feedback form.
    pub feedback_input: String,

    // Overlays.
    pub show_help: bool,
    pub help_scroll_offset: usize,
    pub pending_confirm: Option<ConfirmAction>,
    /// Fatal banner text. When set, rendering collapses to the banner and
    /// input is reduced to reload/quit.
    pub fatal: Option<String>,

    // Status line with expiry. Cow avoids allocation for static literals.
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Dirty flag to skip unnecessary frame renders.
    pub needs_redraw: bool,

    /// In-flight cover/draft file read. A new read aborts the previous one
    /// so only the latest request can land.
    pub file_read_handle: Option<tokio::task::JoinHandle<()>>,
}

impl App {
    pub fn new(db: Database, config: Config) -> Self {
        let tab = match Tab::from_label(&config.default_tab) {
            Some(tab) => tab,
            None => {
                tracing::warn!(
                    value = %config.default_tab,
                    "Unknown default_tab in config, using \"For You\""
                );
                Tab::ForYou
            }
        };

        Self {
            db,
            config,
            articles: Arc::new(Vec::new()),
            bookmarks: Vec::new(),
            followed: Vec::new(),
            downloads: Vec::new(),
            history: Vec::new(),
            identity: None,
            premium: false,
            tab,
            active_category: None,
            search_input: String::new(),
            search_mode: false,
            feed: FeedState::Results(Vec::new()),
            selected: 0,
            view: View::Feed,
            list_selected: 0,
            profile_author: None,
            reader_article: None,
            scroll_offset: 0,
            reader_total_lines: 0,
            reader_visible_lines: 0,
            editor: None,
            settings_name: String::new(),
            settings_email: String::new(),
            settings_field: SettingsField::Name,
            feedback_input: String::new(),
            show_help: false,
            help_scroll_offset: 0,
            pending_confirm: None,
            fatal: None,
            status_message: None,
            needs_redraw: true,
            file_read_handle: None,
        }
    }

    /// Load everything from the database: working set, registries, history,
    /// identity, premium flag. Then re-run the feed pipeline.
    pub async fn load_all(&mut self) -> Result<()> {
        self.articles = Arc::new(self.db.load_articles().await?);
        self.bookmarks = self.db.bookmarked_ids().await?;
        self.followed = self.db.followed_authors().await?;
        self.downloads = self.db.downloaded_ids().await?;
        self.history = self.db.get_history().await?;
        self.identity = self.db.load_identity().await?;
        self.premium = match &self.identity {
            Some(identity) => self.db.is_premium(&identity.name).await?,
            None => false,
        };
        self.recompute_feed();
        self.clamp_selections();
        Ok(())
    }

    // ========================================================================
    // Feed Pipeline
    // ========================================================================

    /// Re-run the feed pipeline over the current inputs and clamp the
    /// selection to the new result set.
    pub fn recompute_feed(&mut self) {
        self.feed = filter_feed(
            &self.articles,
            &self.followed,
            self.tab,
            self.active_category.as_deref(),
            &self.search_input,
        );
        let len = self.feed.len();
        self.selected = if len == 0 {
            0
        } else {
            self.selected.min(len - 1)
        };
    }

    /// Switch feed tabs. Tab changes keep the active category and search
    /// query, the way the tab pills always have.
    pub fn switch_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.recompute_feed();
        }
    }

    /// React to a follow toggle from any view: the Following tab filters by
    /// the follow list, so its results are stale the moment it changes.
    pub fn handle_follows_changed(&mut self) {
        if self.tab == Tab::Following {
            self.recompute_feed();
            self.clamp_selections();
        }
    }

    /// Every category in the working set, first-seen order, deduplicated.
    pub fn categories(&self) -> Vec<Arc<str>> {
        let mut seen: Vec<Arc<str>> = Vec::new();
        for article in self.articles.iter() {
            if !seen.iter().any(|c| c.as_ref() == article.category.as_ref()) {
                seen.push(Arc::clone(&article.category));
            }
        }
        seen
    }

    /// Per-category story count for the categories view.
    pub fn category_count(&self, category: &str) -> usize {
        self.articles
            .iter()
            .filter(|a| &*a.category == category)
            .count()
    }

    /// Activate the category selected in the categories view and return to
    /// the feed. Choosing the already-active category clears it instead.
    pub fn choose_selected_category(&mut self) {
        let categories = self.categories();
        let Some(category) = categories.get(self.list_selected) else {
            return;
        };
        if self.active_category.as_deref() == Some(category.as_ref()) {
            self.active_category = None;
        } else {
            self.active_category = Some(category.to_string());
        }
        self.view = View::Feed;
        self.recompute_feed();
    }

    // ========================================================================
    // Derived Lists
    // ========================================================================

    /// The article under the feed cursor, if any.
    pub fn selected_feed_article(&self) -> Option<&Article> {
        let idx = *self.feed.indices().get(self.selected)?;
        self.articles.get(idx)
    }

    fn find_article(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| &*a.id == id)
    }

    /// Saved stories in save order. Ids that no longer resolve (deleted
    /// stories) are skipped, not surfaced.
    pub fn saved_articles(&self) -> Vec<&Article> {
        self.bookmarks
            .iter()
            .filter_map(|id| self.find_article(id))
            .collect()
    }

    /// Downloaded stories in download order, unresolved ids skipped.
    pub fn downloaded_articles(&self) -> Vec<&Article> {
        self.downloads
            .iter()
            .filter_map(|id| self.find_article(id))
            .collect()
    }

    /// Reading history paired with its articles, most recent first.
    /// Entries whose story no longer resolves are skipped.
    pub fn history_articles(&self) -> Vec<(&HistoryEntry, &Article)> {
        self.history
            .iter()
            .filter_map(|entry| {
                self.find_article(&entry.article_id)
                    .map(|article| (entry, article))
            })
            .collect()
    }

    /// All stories by the profiled author, working-set order.
    pub fn profile_articles(&self) -> Vec<&Article> {
        let Some(author) = self.profile_author.as_deref() else {
            return Vec::new();
        };
        self.articles
            .iter()
            .filter(|a| &*a.author == author)
            .collect()
    }

    /// The "Editor's Picks" sidebar: a fixed window of the working set.
    pub fn curated_picks(&self) -> Vec<&Article> {
        self.articles
            .iter()
            .skip(CURATED_START)
            .take(CURATED_COUNT)
            .collect()
    }

    /// The "Who to Follow" sidebar: the first few distinct authors in the
    /// working set.
    pub fn suggested_authors(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for article in self.articles.iter() {
            let author = &*article.author;
            if !seen.contains(&author) {
                seen.push(author);
                if seen.len() == SUGGESTED_AUTHOR_COUNT {
                    break;
                }
            }
        }
        seen
    }

    /// Stories suggested below the open reader article: the first few
    /// others in the working set.
    pub fn reader_suggestions(&self) -> Vec<&Article> {
        let Some(current) = self.reader_article.as_ref() else {
            return Vec::new();
        };
        self.articles
            .iter()
            .filter(|a| a.id != current.id)
            .take(READER_SUGGESTION_COUNT)
            .collect()
    }

    pub fn is_saved(&self, article_id: &str) -> bool {
        self.bookmarks.iter().any(|id| id == article_id)
    }

    pub fn is_downloaded(&self, article_id: &str) -> bool {
        self.downloads.iter().any(|id| id == article_id)
    }

    pub fn is_following(&self, author: &str) -> bool {
        self.followed.iter().any(|a| a == author)
    }

    // ========================================================================
    // Identity
    // ========================================================================

    pub fn signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Name shown in the sidebar user card.
    pub fn display_name(&self) -> &str {
        self.identity
            .as_ref()
            .map(|i| i.name.as_str())
            .unwrap_or("Guest")
    }

    /// Byline new stories publish under: the signed-in name, or the shared
    /// guest byline.
    pub fn author_name(&self) -> &str {
        self.identity
            .as_ref()
            .map(|i| i.name.as_str())
            .unwrap_or(Identity::GUEST_AUTHOR)
    }

    /// Gate an action on being signed in. When signed out, routes to the
    /// settings view (the sign-in surface) and reports why.
    pub fn require_sign_in(&mut self) -> bool {
        if self.signed_in() {
            return true;
        }
        self.enter_settings();
        self.set_status("Sign in to continue");
        false
    }

    // ========================================================================
    // View Transitions
    // ========================================================================

    /// Switch to a list view with a fresh selection. Feed state survives
    /// untouched so leaving the view returns to the same results.
    pub fn show_view(&mut self, view: View) {
        self.list_selected = 0;
        self.view = view;
    }

    /// Enter settings with the form prefilled from the current identity.
    pub fn enter_settings(&mut self) {
        self.settings_name = self
            .identity
            .as_ref()
            .map(|i| i.name.clone())
            .unwrap_or_default();
        self.settings_email = self
            .identity
            .as_ref()
            .map(|i| i.email.clone())
            .unwrap_or_default();
        self.settings_field = SettingsField::Name;
        self.view = View::Settings;
    }

    pub fn open_profile(&mut self, author: &str) {
        self.profile_author = Some(author.to_string());
        self.list_selected = 0;
        self.view = View::Profile;
    }

    pub fn open_editor(&mut self) {
        self.editor = Some(EditorState::new());
        self.view = View::Editor;
    }

    /// Close the editor, discarding the draft. The platform never asked
    /// before throwing a draft away, and neither do we.
    pub fn close_editor(&mut self) {
        self.editor = None;
        self.view = View::Feed;
    }

    pub fn exit_reader(&mut self) {
        self.view = View::Feed;
        self.reader_article = None;
        self.scroll_offset = 0;
        self.reader_total_lines = 0;
    }

    pub fn exit_to_feed(&mut self) {
        self.view = View::Feed;
    }

    // ========================================================================
    // Opening Articles
    // ========================================================================

    /// The article an action key refers to: the open story in the reader,
    /// otherwise the current selection of the active list view.
    pub fn target_article_id(&self) -> Option<String> {
        if self.view == View::Reader {
            return self.reader_article.as_ref().map(|a| a.id.to_string());
        }
        self.selected_article_id()
    }

    fn selected_article_id(&self) -> Option<String> {
        match self.view {
            View::Feed => self.selected_feed_article().map(|a| a.id.to_string()),
            View::Saved => self
                .saved_articles()
                .get(self.list_selected)
                .map(|a| a.id.to_string()),
            View::History => self
                .history_articles()
                .get(self.list_selected)
                .map(|(_, a)| a.id.to_string()),
            View::Downloads => self
                .downloaded_articles()
                .get(self.list_selected)
                .map(|a| a.id.to_string()),
            View::Profile => self
                .profile_articles()
                .get(self.list_selected)
                .map(|a| a.id.to_string()),
            _ => None,
        }
    }

    /// Open the selected article in the reader. Reading requires being
    /// signed in; signed-out users are routed to settings instead.
    pub async fn open_selected(&mut self) -> Result<()> {
        let Some(id) = self.selected_article_id() else {
            return Ok(());
        };
        if !self.require_sign_in() {
            return Ok(());
        }
        self.open_article(&id).await
    }

    /// Open an article by id. The history entry is recorded before the
    /// reader state flips, so the history view can never show a state that
    /// omits the story currently being read.
    pub async fn open_article(&mut self, id: &str) -> Result<()> {
        let Some(article) = self.find_article(id).cloned() else {
            self.set_status(format!("Article not found (ID: {})", id));
            return Ok(());
        };
        self.db.record_view(id).await?;
        self.history = self.db.get_history().await?;
        self.view = View::Reader;
        self.scroll_offset = 0;
        self.reader_total_lines = 0;
        self.reader_article = Some(article);
        Ok(())
    }

    // ========================================================================
    // Registry Toggles
    // ========================================================================

    pub async fn toggle_bookmark(&mut self, article_id: &str) -> Result<()> {
        let saved = self.db.toggle_bookmark(article_id).await?;
        self.bookmarks = self.db.bookmarked_ids().await?;
        self.set_status(if saved {
            "Saved to your library"
        } else {
            "Removed from your library"
        });
        self.clamp_selections();
        Ok(())
    }

    pub async fn toggle_download(&mut self, article_id: &str) -> Result<()> {
        let downloaded = self.db.toggle_download(article_id).await?;
        self.downloads = self.db.downloaded_ids().await?;
        self.set_status(if downloaded {
            "Saved for offline reading"
        } else {
            "Removed from downloads"
        });
        self.clamp_selections();
        Ok(())
    }

    /// Toggle following an author. Returns the new state so the caller can
    /// broadcast [`AppEvent::FollowsChanged`].
    pub async fn toggle_follow(&mut self, author: &str) -> Result<bool> {
        let following = self.db.toggle_followed_author(author).await?;
        self.followed = self.db.followed_authors().await?;
        self.set_status(if following {
            format!("Following {}", author)
        } else {
            format!("Unfollowed {}", author)
        });
        Ok(following)
    }

    // ========================================================================
    // Publishing and Deleting
    // ========================================================================

    /// Publish the draft in the editor as a local story.
    ///
    /// Derived fields are built here: excerpt from the body, read time at
    /// 200 wpm, today's date, a timestamp id, and a placeholder cover when
    /// none was set. Publishing while signed out falls back to the shared
    /// guest byline rather than failing.
    pub async fn publish_story(&mut self) -> Result<()> {
        let Some(editor) = self.editor.clone() else {
            return Ok(());
        };
        if editor.title.is_empty() || editor.body.is_empty() {
            self.set_status("A story needs at least a title and some words!");
            return Ok(());
        }

        let millis = chrono::Utc::now().timestamp_millis();
        let categories = self.categories();
        let category = categories
            .get(editor.category_index)
            .cloned()
            .unwrap_or_else(|| Arc::from("General"));
        let image: Arc<str> = match editor.cover {
            Some(cover) => Arc::from(cover),
            None => Arc::from(util::placeholder_image_url(millis)),
        };
        let excerpt = util::excerpt_of(&editor.body);
        let read_time = util::read_time_label(&editor.body);

        let article = Article {
            id: Arc::from(format!("{}{}", Article::USER_ID_PREFIX, millis)),
            title: Arc::from(editor.title),
            author: Arc::from(self.author_name()),
            category,
            excerpt: Arc::from(excerpt),
            body: Arc::from(editor.body),
            published: Arc::from(util::publish_date_label()),
            read_time: Arc::from(read_time),
            trending: false,
            image,
            origin: ArticleOrigin::User,
        };

        self.db.insert_user_article(&article).await?;
        self.articles = Arc::new(self.db.load_articles().await?);
        self.editor = None;
        self.view = View::Feed;
        self.recompute_feed();
        self.clamp_selections();
        self.set_status("Your story has been published");
        tracing::info!(id = %article.id, "Story published");
        Ok(())
    }

    /// Whether the profile view offers deletion for `article`.
    ///
    /// The profile surface treats every locally published story (id prefix
    /// `user-`) as deletable, no matter who is signed in. Anyone at this
    /// machine can clean up any local story from here.
    pub fn profile_delete_allowed(article: &Article) -> bool {
        article.has_user_id_prefix()
    }

    /// Whether the reader view offers deletion for `article`.
    ///
    /// The reader surface instead requires the byline to match: the
    /// signed-in name, or "Guest Author" when signed out. Stricter than
    /// [`App::profile_delete_allowed`] in that the two surfaces genuinely
    /// disagree for a local story published under a name the visitor is no
    /// longer signed in as, and looser in one spot: a signed-in author sees
    /// a delete action on their own *seed* stories, where deletion is a
    /// silent no-op. Both behaviors are long-standing and kept as-is.
    pub fn reader_delete_allowed(&self, article: &Article) -> bool {
        self.author_name() == &*article.author
    }

    /// Delete a local story. Seed stories are structurally undeletable at
    /// the storage layer; aiming a delete at one changes nothing, silently,
    /// and the reader still closes as if it had worked.
    ///
    /// Registry entries and history pointing at the deleted id are left
    /// dangling on purpose; every view resolves ids against the working set
    /// and skips the ones that no longer exist.
    pub async fn delete_story(&mut self, article_id: &str, origin: DeleteOrigin) -> Result<()> {
        let deleted = self.db.delete_user_article(article_id).await?;
        if deleted {
            self.articles = Arc::new(self.db.load_articles().await?);
            self.recompute_feed();
            self.set_status("Story deleted");
            tracing::info!(id = %article_id, "Story deleted");
        }
        if origin == DeleteOrigin::Reader {
            self.exit_reader();
        }
        self.clamp_selections();
        Ok(())
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Remove the history entry selected in the history view.
    pub async fn remove_selected_history_entry(&mut self) -> Result<()> {
        let Some(article_id) = self
            .history_articles()
            .get(self.list_selected)
            .map(|(entry, _)| entry.article_id.clone())
        else {
            return Ok(());
        };
        self.db.remove_history_entry(&article_id).await?;
        self.history = self.db.get_history().await?;
        self.set_status("Removed from history");
        self.clamp_selections();
        Ok(())
    }

    /// Clear the whole reading history, including entries whose stories no
    /// longer resolve.
    pub async fn clear_history(&mut self) -> Result<()> {
        self.db.clear_history().await?;
        self.history.clear();
        self.set_status("Reading history cleared");
        self.clamp_selections();
        Ok(())
    }

    // ========================================================================
    // Settings, Sign-out, Premium, Feedback
    // ========================================================================

    /// Persist the settings form as the identity. Values are stored as
    /// typed; saving an empty name signs the user out in effect, since an
    /// empty name never counts as signed in.
    pub async fn save_settings(&mut self) -> Result<()> {
        let identity = Identity {
            name: self.settings_name.clone(),
            email: self.settings_email.clone(),
        };
        self.db.save_identity(&identity).await?;
        self.identity = self.db.load_identity().await?;
        self.premium = match &self.identity {
            Some(identity) => self.db.is_premium(&identity.name).await?,
            None => false,
        };
        self.set_status("Settings saved!");
        Ok(())
    }

    /// Sign out: clears the identity but nothing else. Bookmarks, follows,
    /// downloads, history, and any premium grant all survive for the next
    /// sign-in.
    pub async fn sign_out(&mut self) -> Result<()> {
        self.db.clear_identity().await?;
        self.identity = None;
        self.premium = false;
        self.settings_name.clear();
        self.settings_email.clear();
        self.view = View::Feed;
        self.set_status("Signed out");
        Ok(())
    }

    /// Complete the premium upgrade for the signed-in identity. The grant
    /// is keyed by name, so it outlives sign-out and waits for the same
    /// name to sign back in.
    pub async fn complete_subscription(&mut self) -> Result<()> {
        let Some(identity) = self.identity.clone() else {
            return Ok(());
        };
        self.db.set_premium(&identity.name).await?;
        self.premium = true;
        self.view = View::Feed;
        self.set_status("Payment Successful! Welcome to Premium.");
        Ok(())
    }

    /// Acknowledge feedback. Nothing is transmitted anywhere; the platform
    /// only ever thanked the user.
    pub fn submit_feedback(&mut self) {
        tracing::info!(chars = self.feedback_input.len(), "Feedback submitted");
        self.feedback_input.clear();
        self.set_status("Thank you for your feedback!");
    }

    // ========================================================================
    // Navigation and Selection
    // ========================================================================

    fn current_list_len(&self) -> usize {
        match self.view {
            View::Saved => self.saved_articles().len(),
            View::History => self.history_articles().len(),
            View::Downloads => self.downloaded_articles().len(),
            View::Profile => self.profile_articles().len(),
            View::Categories => self.categories().len(),
            _ => 0,
        }
    }

    /// Navigate up in the current list.
    pub fn nav_up(&mut self) {
        match self.view {
            View::Feed => {
                self.selected = self.selected.saturating_sub(1);
            }
            View::Saved | View::History | View::Downloads | View::Profile | View::Categories => {
                self.list_selected = self.list_selected.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// Navigate down in the current list.
    pub fn nav_down(&mut self) {
        match self.view {
            View::Feed => {
                let len = self.feed.len();
                if len > 0 {
                    self.selected = self.selected.saturating_add(1).min(len - 1);
                }
            }
            View::Saved | View::History | View::Downloads | View::Profile | View::Categories => {
                let len = self.current_list_len();
                if len > 0 {
                    self.list_selected = self.list_selected.saturating_add(1).min(len - 1);
                }
            }
            _ => {}
        }
    }

    /// Clamp all selection indices to valid ranges. Call after any
    /// operation that may shrink a list out from under its cursor.
    pub fn clamp_selections(&mut self) {
        let feed_len = self.feed.len();
        self.selected = if feed_len == 0 {
            0
        } else {
            self.selected.min(feed_len.saturating_sub(1))
        };

        let list_len = self.current_list_len();
        self.list_selected = if list_len == 0 {
            0
        } else {
            self.list_selected.min(list_len.saturating_sub(1))
        };

        let category_count = self.categories().len();
        if let Some(editor) = self.editor.as_mut() {
            editor.category_index = if category_count == 0 {
                0
            } else {
                editor.category_index.min(category_count - 1)
            };
        }

        debug_assert!(
            feed_len == 0 || self.selected < feed_len,
            "selected {} out of bounds for feed len {}",
            self.selected,
            feed_len
        );
        debug_assert!(
            list_len == 0 || self.list_selected < list_len,
            "list_selected {} out of bounds for list len {}",
            self.list_selected,
            list_len
        );
    }

    // ========================================================================
    // Scrolling
    // ========================================================================

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Clamp the reader scroll to the content bounds from the last render.
    pub fn clamp_reader_scroll(&mut self) {
        let max_scroll = self
            .reader_total_lines
            .saturating_sub(self.reader_visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    // ========================================================================
    // Status and Fatal State
    // ========================================================================

    /// Set status message (will auto-expire after 3 seconds).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds).
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Collapse the UI to a fatal banner. Reading state stays in memory;
    /// the user can reload in place or quit.
    pub fn set_fatal(&mut self, error: impl Into<String>) {
        let error = error.into();
        tracing::error!(error = %error, "Entering fatal state");
        self.fatal = Some(error);
    }

    /// Reload everything from the database and leave the fatal state.
    pub async fn recover_from_fatal(&mut self) -> Result<()> {
        self.fatal = None;
        self.view = View::Feed;
        self.load_all().await?;
        self.set_status("Reloaded");
        Ok(())
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort the in-flight file read on App drop so no orphaned task outlives
/// the event loop.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.file_read_handle.take() {
            handle.abort();
            tracing::debug!("Aborted file read task on App drop");
        }
    }
}
